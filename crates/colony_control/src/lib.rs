use colony_core::{
    distance_from_capital, mission_terms, BodyId, BodyKind, BuildingDef, BuildingId, Category,
    CelestialBody, Command, CommandEnvelope, CommandId, GameContent, GameState, MissionKind,
    SlotIndex,
};

pub trait CommandSource {
    fn generate_commands(
        &mut self,
        state: &GameState,
        content: &GameContent,
        next_command_id: &mut u64,
    ) -> Vec<CommandEnvelope>;
}

/// Grows the colony automatically. Per colonised body, at most one build:
/// 1. Wind turbine when energy headroom cannot cover the next consumer.
/// 2. Organic farm when food stock is below population.
/// 3. Pod settlement when population has reached habitation capacity.
///
/// When no body needed a build and no mission is running, probe the nearest
/// unprobed body, or else colonise the nearest probed one.
pub struct AutopilotController;

const WIND_TURBINE: &str = "wind_turbine";
const ORGANIC_FARM: &str = "organic_farm";
const POD_SETTLEMENT: &str = "pod_settlement";

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Allocates a command ID and builds a `CommandEnvelope`.
fn make_cmd(tick: u64, next_id: &mut u64, command: Command) -> CommandEnvelope {
    let cmd_id = CommandId(format!("cmd_{:06}", *next_id));
    *next_id += 1;
    CommandEnvelope {
        id: cmd_id,
        issued_tick: tick,
        execute_at_tick: tick,
        command,
    }
}

fn catalog_entry<'a>(
    content: &'a GameContent,
    category: Category,
    id: &str,
) -> Option<&'a BuildingDef> {
    content
        .building(category, &BuildingId(id.to_string()))
        .ok()
}

fn free_slot(body: &CelestialBody, category: Category) -> Option<SlotIndex> {
    SlotIndex::all().find(|slot| body.occupant(category, *slot).is_none())
}

fn headroom(body: &CelestialBody) -> u32 {
    body.energy_capacity.saturating_sub(body.energy_usage)
}

/// Picks the one build this body needs most, if it can be paid for and
/// would pass construction checks.
fn build_priority(
    body: &CelestialBody,
    content: &GameContent,
    budget: u64,
) -> Option<(Category, SlotIndex, &'static str, u64)> {
    let staple = content.constants.staple_good.as_str();
    let farm = catalog_entry(content, Category::Res, ORGANIC_FARM)
        .filter(|_| body.atmosphere && body.stock(staple) < body.population);
    let pod = catalog_entry(content, Category::Hab, POD_SETTLEMENT)
        .filter(|_| body.population >= body.habitation_capacity);

    // Priority 1: power for whichever consumer is wanted next.
    let wanted_drain = farm.or(pod).map(|def| def.energy_drain);
    if let Some(drain) = wanted_drain {
        if headroom(body) < drain && body.wind_level >= 1 {
            let turbine = catalog_entry(content, Category::Enr, WIND_TURBINE)?;
            let slot = free_slot(body, Category::Enr)?;
            return (turbine.price <= budget).then_some((
                Category::Enr,
                slot,
                WIND_TURBINE,
                turbine.price,
            ));
        }
    }

    // Priority 2 and 3: the consumer itself.
    for (def, category, id) in [
        (farm, Category::Res, ORGANIC_FARM),
        (pod, Category::Hab, POD_SETTLEMENT),
    ] {
        let Some(def) = def else { continue };
        if def.price > budget || headroom(body) < def.energy_drain {
            continue;
        }
        if let Some(slot) = free_slot(body, category) {
            return Some((category, slot, id, def.price));
        }
    }
    None
}

/// Nearest body matching `eligible`, ties broken by id.
fn nearest(
    state: &GameState,
    eligible: impl Fn(&CelestialBody) -> bool,
) -> Option<(BodyId, f64)> {
    state
        .bodies
        .iter()
        .filter(|body| body.kind != BodyKind::Star && eligible(body))
        .filter_map(|body| {
            distance_from_capital(state, &body.id)
                .ok()
                .map(|d| (body.id.clone(), d))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)))
}

fn mission_priority(
    state: &GameState,
    content: &GameContent,
    budget: u64,
) -> Option<Command> {
    if state.bodies.iter().any(|body| body.active_mission().is_some()) {
        return None;
    }
    let (kind, (body, distance)) = nearest(state, |b| !b.probed)
        .map(|target| (MissionKind::Probe, target))
        .or_else(|| {
            nearest(state, |b| b.probed && !b.colonised)
                .map(|target| (MissionKind::Colonise, target))
        })?;
    let (cost, _) = mission_terms(kind, distance, &content.constants);
    if cost > budget {
        return None;
    }
    Some(match kind {
        MissionKind::Probe => Command::Probe { body },
        MissionKind::Colonise => Command::Colonise { body },
    })
}

// ---------------------------------------------------------------------------
// AutopilotController
// ---------------------------------------------------------------------------

impl CommandSource for AutopilotController {
    fn generate_commands(
        &mut self,
        state: &GameState,
        content: &GameContent,
        next_command_id: &mut u64,
    ) -> Vec<CommandEnvelope> {
        let tick = state.meta.tick;
        let mut budget = state.economy.money;
        let mut commands = Vec::new();

        for body in state.bodies.iter().filter(|body| body.colonised) {
            let Some((category, slot, id, price)) = build_priority(body, content, budget) else {
                continue;
            };
            budget -= price;
            commands.push(make_cmd(
                tick,
                next_command_id,
                Command::Construct {
                    body: body.id.clone(),
                    category,
                    slot,
                    building: BuildingId(id.to_string()),
                },
            ));
        }

        if commands.is_empty() {
            if let Some(command) = mission_priority(state, content, budget) {
                commands.push(make_cmd(tick, next_command_id, command));
            }
        }

        commands
    }
}
