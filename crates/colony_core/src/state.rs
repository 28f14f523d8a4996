use std::collections::BTreeMap;

use crate::ledger::Ledger;
use crate::scheduler::{JobKey, JobKind, Scheduler};
use crate::{
    BodyDef, CelestialBody, Counters, EconomyState, GameContent, GameState, MetaState,
};

pub const SCHEMA_VERSION: u32 = 1;

/// Builds the starting ledger from content.
///
/// The first body flagged `capital` starts colonised with the capital
/// population and habitation baseline. Every colonised body gets a
/// population job.
pub fn initial_state(content: &GameContent, seed: u64) -> GameState {
    let constants = &content.constants;
    let mut bodies = Ledger::default();
    let mut scheduler = Scheduler::default();
    let mut capital = None;

    for def in &content.bodies {
        let mut body = body_from_def(def);
        if def.capital && capital.is_none() {
            body.colonised = true;
            body.probed = true;
            body.population = constants.capital_population;
            body.habitation_capacity = constants.capital_habitation_capacity;
            capital = Some(def.id.clone());
        }
        if body.colonised {
            scheduler.register(
                JobKey::Population(def.id.clone()),
                JobKind::Population,
                constants.population_interval_ticks,
            );
        }
        bodies.insert(body);
    }

    GameState {
        meta: MetaState {
            tick: 0,
            seed,
            schema_version: SCHEMA_VERSION,
            content_version: content.content_version.clone(),
        },
        economy: EconomyState {
            money: constants.starting_money,
            ..EconomyState::default()
        },
        capital,
        bodies,
        scheduler,
        counters: Counters::default(),
    }
}

fn body_from_def(def: &BodyDef) -> CelestialBody {
    CelestialBody {
        id: def.id.clone(),
        name: def.name.clone(),
        kind: def.kind,
        scale: def.scale,
        orbital_distance: def.orbital_distance,
        position: def.position,
        atmosphere: def.atmosphere,
        wind_level: def.wind_level,
        resources: def.resources.clone(),
        energy_capacity: 0,
        energy_usage: 0,
        habitation_capacity: 0,
        population: 0,
        goods: BTreeMap::new(),
        probed: def.probed || def.colonised,
        colonised: def.colonised,
        slots: BTreeMap::new(),
        messages: BTreeMap::new(),
    }
}
