//! `colony_core`: deterministic colony economy tick.
//!
//! No network, no IO beyond the metrics CSV writer. All randomness via the
//! passed-in Rng.

mod catalog;
mod commands;
mod construction;
mod economy;
mod engine;
mod error;
pub mod ledger;
pub mod metrics;
mod missions;
mod population;
mod production;
pub mod scheduler;
mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;
mod types;
mod world;

pub use construction::{construct, salvage};
pub use economy::{calendar, system_population};
pub use engine::tick;
pub use error::ColonyError;
pub use ledger::Ledger;
pub use metrics::{
    append_metrics_row, compute_metrics, write_metrics_header, MetricsFileWriter,
    MetricsSnapshot,
};
pub use missions::{colonise, distance_from_capital, mission_terms, probe};
pub use scheduler::{JobKey, JobKind, ScheduledJob, Scheduler};
pub use state::{initial_state, SCHEMA_VERSION};
pub use types::*;
pub use world::World;

pub(crate) fn emit(counters: &mut Counters, tick: u64, event: Event) -> EventEnvelope {
    let id = EventId(format!("evt_{:06}", counters.next_event_id));
    counters.next_event_id += 1;
    EventEnvelope { id, tick, event }
}

#[cfg(test)]
mod tests;
