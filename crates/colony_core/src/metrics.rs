//! Snapshot metrics computed from `GameState`.
//!
//! `compute_metrics(&GameState, &GameContent) -> MetricsSnapshot` samples the
//! current state for time-series analysis. The CSV writer below is the only
//! IO in this crate.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::economy::system_population;
use crate::{BodyKind, GameContent, GameState};

/// Current schema version, bump when fields are added/removed/reordered.
const METRICS_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub tick: u64,
    pub metrics_version: u32,

    // Aggregates
    pub money: u64,
    pub system_population: u64,
    pub year: u64,
    pub day: u64,

    // Lifecycle
    pub bodies_probed: u32,
    pub bodies_colonised: u32,
    pub active_missions: u32,

    // Slots
    pub occupied_slots: u32,
    pub faulted_slots: u32,

    // Energy (all bodies)
    pub energy_capacity: u64,
    pub energy_usage: u64,
    pub browned_out_bodies: u32,

    // Goods
    pub total_goods: u64,
    pub storage_used_pct: f32,
    pub habitation_capacity: u64,
}

pub fn compute_metrics(state: &GameState, content: &GameContent) -> MetricsSnapshot {
    let mut snapshot = MetricsSnapshot {
        tick: state.meta.tick,
        metrics_version: METRICS_VERSION,
        money: state.economy.money,
        system_population: system_population(state),
        year: state.economy.year,
        day: state.economy.day,
        bodies_probed: 0,
        bodies_colonised: 0,
        active_missions: 0,
        occupied_slots: 0,
        faulted_slots: 0,
        energy_capacity: 0,
        energy_usage: 0,
        browned_out_bodies: 0,
        total_goods: 0,
        storage_used_pct: 0.0,
        habitation_capacity: 0,
    };

    let mut good_slots = 0u64;
    for body in state.bodies.iter().filter(|b| b.kind != BodyKind::Star) {
        snapshot.bodies_probed += u32::from(body.probed);
        snapshot.bodies_colonised += u32::from(body.colonised);
        snapshot.active_missions += u32::from(body.active_mission().is_some());
        for (_, _, occupant) in body.occupied_slots() {
            snapshot.occupied_slots += 1;
            snapshot.faulted_slots += u32::from(occupant.fault.is_some());
        }
        snapshot.energy_capacity += u64::from(body.energy_capacity);
        snapshot.energy_usage += u64::from(body.energy_usage);
        snapshot.browned_out_bodies += u32::from(body.energy_usage > body.energy_capacity);
        snapshot.habitation_capacity += u64::from(body.habitation_capacity);
        snapshot.total_goods += body.goods.values().map(|&q| u64::from(q)).sum::<u64>();
        good_slots += body.goods.len() as u64;
    }

    let capacity = good_slots * u64::from(content.constants.storage_cap);
    if capacity > 0 {
        snapshot.storage_used_pct = (snapshot.total_goods as f64 / capacity as f64 * 100.0) as f32;
    }
    snapshot
}

/// Write the CSV header row.
pub fn write_metrics_header(writer: &mut impl Write) -> std::io::Result<()> {
    writeln!(
        writer,
        "tick,metrics_version,\
         money,system_population,year,day,\
         bodies_probed,bodies_colonised,active_missions,\
         occupied_slots,faulted_slots,\
         energy_capacity,energy_usage,browned_out_bodies,\
         total_goods,storage_used_pct,habitation_capacity"
    )
}

/// Append a single metrics snapshot as a CSV row.
pub fn append_metrics_row(
    writer: &mut impl Write,
    snapshot: &MetricsSnapshot,
) -> std::io::Result<()> {
    writeln!(
        writer,
        "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{:.2},{}",
        snapshot.tick,
        snapshot.metrics_version,
        snapshot.money,
        snapshot.system_population,
        snapshot.year,
        snapshot.day,
        snapshot.bodies_probed,
        snapshot.bodies_colonised,
        snapshot.active_missions,
        snapshot.occupied_slots,
        snapshot.faulted_slots,
        snapshot.energy_capacity,
        snapshot.energy_usage,
        snapshot.browned_out_bodies,
        snapshot.total_goods,
        snapshot.storage_used_pct,
        snapshot.habitation_capacity,
    )
}

/// Rows per CSV file before the writer starts the next numbered file.
const ROWS_PER_FILE: usize = 50_000;

/// Appends snapshot rows to `metrics_NNN.csv` files inside a run directory.
/// Every file starts with its own header row.
pub struct MetricsFileWriter {
    run_dir: PathBuf,
    rows_per_file: usize,
    current: CsvFile,
}

struct CsvFile {
    index: u32,
    rows: usize,
    out: BufWriter<File>,
}

impl CsvFile {
    fn create(run_dir: &Path, index: u32) -> std::io::Result<Self> {
        let path = run_dir.join(format!("metrics_{index:03}.csv"));
        let mut out = BufWriter::new(File::create(&path)?);
        write_metrics_header(&mut out)?;
        tracing::debug!(path = %path.display(), "metrics file opened");
        Ok(Self { index, rows: 0, out })
    }
}

impl MetricsFileWriter {
    pub fn new(run_dir: PathBuf) -> std::io::Result<Self> {
        Self::with_rotation(run_dir, ROWS_PER_FILE)
    }

    /// Like `new`, with a custom row limit per file (at least one).
    pub fn with_rotation(run_dir: PathBuf, rows_per_file: usize) -> std::io::Result<Self> {
        let current = CsvFile::create(&run_dir, 0)?;
        Ok(Self {
            run_dir,
            rows_per_file: rows_per_file.max(1),
            current,
        })
    }

    pub fn write_row(&mut self, snapshot: &MetricsSnapshot) -> std::io::Result<()> {
        if self.current.rows == self.rows_per_file {
            self.current.out.flush()?;
            self.current = CsvFile::create(&self.run_dir, self.current.index + 1)?;
        }
        append_metrics_row(&mut self.current.out, snapshot)?;
        self.current.rows += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.current.out.flush()
    }
}
