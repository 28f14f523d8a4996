//! Job table driving every periodic rule.
//!
//! Each job is keyed by what it acts on and carries its own timer. Jobs never
//! hold references into the ledger; the engine resolves the key each run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{BodyId, GoodId, MissionKind, SlotKey};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JobKey {
    Slot(SlotKey),
    Mission { body: BodyId, kind: MissionKind },
    Population(BodyId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobKind {
    /// Adds `rate` of `good` per run. `rate` is already abundance-scaled.
    Extraction { good: GoodId, rate: u32 },
    Processing {
        input: GoodId,
        input_rate: u32,
        output: GoodId,
        output_rate: u32,
    },
    /// Burns fuel to keep `capacity` worth of energy online.
    Consumption {
        input: GoodId,
        input_rate: u32,
        capacity: u32,
    },
    MissionCountdown,
    Population,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledJob {
    pub key: JobKey,
    pub kind: JobKind,
    pub interval_ticks: u64,
    pub ticks_since_last_run: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ScheduledJob>", into = "Vec<ScheduledJob>")]
pub struct Scheduler {
    jobs: BTreeMap<JobKey, ScheduledJob>,
}

impl Scheduler {
    /// Registers a job, replacing any job under the same key.
    pub fn register(&mut self, key: JobKey, kind: JobKind, interval_ticks: u64) {
        let job = ScheduledJob {
            key: key.clone(),
            kind,
            interval_ticks: interval_ticks.max(1),
            ticks_since_last_run: 0,
        };
        self.jobs.insert(key, job);
    }

    /// Removes a job. Cancelling an absent job is a no-op.
    pub fn cancel(&mut self, key: &JobKey) -> bool {
        self.jobs.remove(key).is_some()
    }

    pub fn is_registered(&self, key: &JobKey) -> bool {
        self.jobs.contains_key(key)
    }

    pub fn get(&self, key: &JobKey) -> Option<&ScheduledJob> {
        self.jobs.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledJob> {
        self.jobs.values()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Advances every timer by one tick and returns the jobs due this tick,
    /// in key order.
    pub(crate) fn advance(&mut self) -> Vec<(JobKey, JobKind)> {
        let mut due = Vec::new();
        for job in self.jobs.values_mut() {
            job.ticks_since_last_run += 1;
            if job.ticks_since_last_run >= job.interval_ticks {
                job.ticks_since_last_run = 0;
                due.push((job.key.clone(), job.kind.clone()));
            }
        }
        due
    }
}

impl From<Vec<ScheduledJob>> for Scheduler {
    fn from(jobs: Vec<ScheduledJob>) -> Self {
        Self {
            jobs: jobs.into_iter().map(|job| (job.key.clone(), job)).collect(),
        }
    }
}

impl From<Scheduler> for Vec<ScheduledJob> {
    fn from(scheduler: Scheduler) -> Self {
        scheduler.jobs.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, SlotIndex};

    fn slot_key(slot: u8) -> JobKey {
        JobKey::Slot(SlotKey {
            body: BodyId("earth".to_string()),
            category: Category::Res,
            slot: SlotIndex::new(slot).unwrap(),
        })
    }

    fn extraction() -> JobKind {
        JobKind::Extraction {
            good: "Coal sacks".to_string(),
            rate: 10,
        }
    }

    #[test]
    fn job_runs_once_per_interval() {
        let mut scheduler = Scheduler::default();
        scheduler.register(slot_key(1), extraction(), 3);

        let runs: Vec<usize> = (0..9).map(|_| scheduler.advance().len()).collect();
        assert_eq!(runs, vec![0, 0, 1, 0, 0, 1, 0, 0, 1]);
    }

    #[test]
    fn independent_timers_do_not_share_phase() {
        let mut scheduler = Scheduler::default();
        scheduler.register(slot_key(1), extraction(), 3);
        scheduler.advance();
        scheduler.register(slot_key(2), extraction(), 3);

        let due = scheduler.advance();
        assert!(due.is_empty());
        let due = scheduler.advance();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].0, slot_key(1));
        let due = scheduler.advance();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].0, slot_key(2));
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut scheduler = Scheduler::default();
        scheduler.register(slot_key(1), extraction(), 3);
        assert!(scheduler.cancel(&slot_key(1)));
        assert!(!scheduler.cancel(&slot_key(1)));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn zero_interval_is_clamped_to_every_tick() {
        let mut scheduler = Scheduler::default();
        scheduler.register(JobKey::Population(BodyId("earth".to_string())), JobKind::Population, 0);
        assert_eq!(scheduler.advance().len(), 1);
        assert_eq!(scheduler.advance().len(), 1);
    }

    #[test]
    fn serializes_as_job_list() {
        let mut scheduler = Scheduler::default();
        scheduler.register(slot_key(2), extraction(), 3);
        scheduler.register(
            JobKey::Mission {
                body: BodyId("mars".to_string()),
                kind: MissionKind::Probe,
            },
            JobKind::MissionCountdown,
            1,
        );
        let json = serde_json::to_string(&scheduler).unwrap();
        let restored: Scheduler = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 2);
        assert!(restored.is_registered(&slot_key(2)));
    }
}
