//! Process-wide aggregates: tax collection and the calendar.
//!
//! Runs after every per-body job of the tick, so it always reads a settled
//! ledger.

use crate::{BodyKind, Constants, Event, EventEnvelope, GameState};

const DAYS_PER_YEAR: u64 = 365;
const DAYS_PER_CALENDAR_STEP: u64 = 30;

/// Year and day counters after `elapsed_ticks`.
///
/// One year spans `ticks_per_year`; the day counter advances once every
/// `ticks_per_year / 365 * 30` ticks and never wraps.
pub fn calendar(elapsed_ticks: u64, ticks_per_year: u64) -> (u64, u64) {
    let ticks_per_year = ticks_per_year.max(1);
    let year = elapsed_ticks / ticks_per_year;
    let day = elapsed_ticks * DAYS_PER_YEAR / (DAYS_PER_CALENDAR_STEP * ticks_per_year);
    (year, day)
}

pub fn system_population(state: &GameState) -> u64 {
    state
        .bodies
        .iter()
        .filter(|body| body.kind != BodyKind::Star)
        .map(|body| u64::from(body.population))
        .sum()
}

pub(crate) fn advance_calendar(state: &mut GameState, constants: &Constants) {
    let (year, day) = calendar(state.meta.tick + 1, constants.ticks_per_year);
    state.economy.year = year;
    state.economy.day = day;
}

pub(crate) fn collect_taxes(
    state: &mut GameState,
    constants: &Constants,
    events: &mut Vec<EventEnvelope>,
) {
    state.economy.ticks_since_tax += 1;
    if state.economy.ticks_since_tax < constants.tax_interval_ticks.max(1) {
        return;
    }
    state.economy.ticks_since_tax = 0;

    let population = system_population(state);
    let tax = (population as f64 * constants.tax_factor).round_ties_even() as u64;
    state.economy.money += tax;
    state.economy.system_population = population;

    events.push(crate::emit(
        &mut state.counters,
        state.meta.tick,
        Event::AggregatesUpdated {
            money: state.economy.money,
            system_population: population,
            year: state.economy.year,
            day: state.economy.day,
        },
    ));
}
