//! Population growth on colonised bodies, fed by the staple good.

use rand::Rng;

use crate::scheduler::JobKey;
use crate::{BodyId, CelestialBody, Constants, Event, EventEnvelope, EventLevel, GameState};

pub(crate) fn run_population(
    state: &mut GameState,
    constants: &Constants,
    body_id: &BodyId,
    rng: &mut impl Rng,
    event_level: EventLevel,
    events: &mut Vec<EventEnvelope>,
) {
    let Some(body) = state.bodies.get_mut(body_id) else {
        state.scheduler.cancel(&JobKey::Population(body_id.clone()));
        return;
    };
    if !body.colonised {
        state.scheduler.cancel(&JobKey::Population(body_id.clone()));
        return;
    }

    let before = body.population;
    grow(body, constants, rng);

    if body.population != before && event_level == EventLevel::Debug {
        let population = body.population;
        events.push(crate::emit(
            &mut state.counters,
            state.meta.tick,
            Event::PopulationChanged {
                body: body_id.clone(),
                population,
            },
        ));
    }
}

/// Shortage shrinks the colony by 1..=2. An empty staple stock is always a
/// shortage, even for an empty colony. A full colony holds steady and eats.
/// Otherwise it grows by 1..=3, never past habitation capacity, and eats in
/// proportion to the new population.
fn grow(body: &mut CelestialBody, constants: &Constants, rng: &mut impl Rng) {
    let staple = constants.staple_good.as_str();
    let food = body.stock(staple);

    if food == 0 || food < body.population {
        let loss: u32 = rng.gen_range(1..=2);
        body.population = body.population.saturating_sub(loss);
        return;
    }
    if body.population < body.habitation_capacity {
        let gain: u32 = rng.gen_range(1..=3);
        body.population = (body.population + gain).min(body.habitation_capacity);
    }
    let eaten = (f64::from(body.population) * constants.food_consumption_factor)
        .round_ties_even() as u32;
    body.goods
        .insert(staple.to_string(), food.saturating_sub(eaten));
}
