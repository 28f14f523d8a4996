use super::*;
use crate::test_fixtures::{base_content, base_state, base_world, make_rng};

mod commands;
mod processing;
mod salvage;

// --- Shared test helpers ------------------------------------------------

fn earth() -> BodyId {
    BodyId("earth".to_string())
}

fn rock() -> BodyId {
    BodyId("rock".to_string())
}

fn moon() -> BodyId {
    BodyId("moon".to_string())
}

fn slot(index: u8) -> SlotIndex {
    SlotIndex::new(index).unwrap()
}

fn key(body: &BodyId, category: Category, index: u8) -> SlotKey {
    SlotKey {
        body: body.clone(),
        category,
        slot: slot(index),
    }
}

fn building(id: &str) -> BuildingId {
    BuildingId(id.to_string())
}

/// Builds `id` into `category` slot `index` on `body`, discarding events.
fn build_on(
    state: &mut GameState,
    content: &GameContent,
    body: &BodyId,
    category: Category,
    index: u8,
    id: &str,
) -> Result<(), ColonyError> {
    let mut events = Vec::new();
    construct(state, content, &key(body, category, index), &building(id), &mut events)
}

fn build(
    state: &mut GameState,
    content: &GameContent,
    category: Category,
    index: u8,
    id: &str,
) -> Result<(), ColonyError> {
    build_on(state, content, &earth(), category, index, id)
}

fn run_ticks(state: &mut GameState, content: &GameContent, ticks: u64) -> Vec<EventEnvelope> {
    let mut rng = make_rng();
    let mut events = Vec::new();
    for _ in 0..ticks {
        events.extend(tick(state, &[], content, &mut rng, EventLevel::Normal));
    }
    events
}

fn with_body(state: &mut GameState, body: &BodyId, f: impl FnOnce(&mut CelestialBody)) {
    state.bodies.mutate(body, f).unwrap();
}

fn set_stock(state: &mut GameState, body: &BodyId, good: &str, quantity: u32) {
    with_body(state, body, |b| {
        b.goods.insert(good.to_string(), quantity);
    });
}

fn stock(state: &GameState, body: &BodyId, good: &str) -> u32 {
    state.bodies.get(body).unwrap().stock(good)
}

fn fault_at(state: &GameState, body: &BodyId, category: Category, index: u8) -> Option<Fault> {
    state
        .bodies
        .get(body)
        .unwrap()
        .occupant(category, slot(index))
        .and_then(|occupant| occupant.fault.clone())
}

fn fault_changes(events: &[EventEnvelope]) -> Vec<Option<FaultKind>> {
    events
        .iter()
        .filter_map(|e| match &e.event {
            Event::FaultChanged { fault, .. } => Some(fault.clone()),
            _ => None,
        })
        .collect()
}

/// Earth with ample energy so slot jobs never brown out unless a test says so.
fn powered_state(content: &GameContent) -> GameState {
    let mut state = base_state(content);
    with_body(&mut state, &earth(), |b| b.energy_capacity = 5000);
    state
}
