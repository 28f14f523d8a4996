use rand::Rng;

use crate::commands::apply_commands;
use crate::economy::{advance_calendar, collect_taxes};
use crate::missions::advance_mission;
use crate::population::run_population;
use crate::production::run_slot_job;
use crate::scheduler::JobKey;
use crate::{CommandEnvelope, EventEnvelope, EventLevel, GameContent, GameState};

/// Advance the simulation by one tick.
///
/// Order of operations:
/// 1. Apply commands scheduled for this tick.
/// 2. Run every job whose timer is due, in job-key order.
/// 3. Advance the calendar and, when due, collect taxes.
/// 4. Increment tick counter.
///
/// Returns all events produced this tick.
pub fn tick(
    state: &mut GameState,
    commands: &[CommandEnvelope],
    content: &GameContent,
    rng: &mut impl Rng,
    event_level: EventLevel,
) -> Vec<EventEnvelope> {
    let mut events = Vec::new();

    apply_commands(state, commands, content, &mut events);
    run_due_jobs(state, content, rng, event_level, &mut events);
    advance_calendar(state, &content.constants);
    collect_taxes(state, &content.constants, &mut events);

    state.meta.tick += 1;
    events
}

fn run_due_jobs(
    state: &mut GameState,
    content: &GameContent,
    rng: &mut impl Rng,
    event_level: EventLevel,
    events: &mut Vec<EventEnvelope>,
) {
    for (key, kind) in state.scheduler.advance() {
        // An earlier job this tick may have cancelled this one.
        if !state.scheduler.is_registered(&key) {
            continue;
        }
        match &key {
            JobKey::Slot(slot_key) => run_slot_job(state, content, slot_key, &kind, events),
            JobKey::Mission {
                body,
                kind: mission,
            } => advance_mission(state, content, body, *mission, events),
            JobKey::Population(body) => {
                run_population(state, &content.constants, body, rng, event_level, events);
            }
        }
    }
}
