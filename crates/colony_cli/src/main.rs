use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colony_control::{AutopilotController, CommandSource};
use colony_core::{
    compute_metrics, Event, EventEnvelope, EventLevel, GameContent, MetricsFileWriter, World,
};
use colony_world::{build_world, load_content, load_state, resume_world, save_state};
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "colony_cli", about = "Colony economy simulation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the colony for a fixed number of ticks under the autopilot.
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    #[arg(long)]
    ticks: u64,
    /// Start a fresh colony with this seed. Mutually exclusive with --state.
    #[arg(long, conflicts_with = "state_file")]
    seed: Option<u64>,
    /// Resume from a saved GameState JSON file. Mutually exclusive with --seed.
    #[arg(long = "state", conflicts_with = "seed")]
    state_file: Option<PathBuf>,
    /// Write the final GameState here so the run can be resumed.
    #[arg(long)]
    save: Option<PathBuf>,
    #[arg(long, default_value = "./content")]
    content_dir: String,
    #[arg(long, default_value_t = 100)]
    print_every: u64,
    #[arg(long, default_value = "normal", value_parser = ["normal", "debug"])]
    event_level: String,
    /// Sample metrics every N ticks.
    #[arg(long, default_value_t = 30)]
    metrics_every: u64,
    /// Disable metrics collection to the runs/ directory.
    #[arg(long)]
    no_metrics: bool,
}

// ---------------------------------------------------------------------------
// Run directory
// ---------------------------------------------------------------------------

fn generate_run_id(seed: u64) -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let (year, month, day) = civil_from_days(secs / 86_400);
    let time_of_day = secs % 86_400;
    format!(
        "{year:04}{month:02}{day:02}_{:02}{:02}{:02}_seed{seed}",
        time_of_day / 3600,
        (time_of_day % 3600) / 60,
        time_of_day % 60,
    )
}

/// Days since the Unix epoch to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: u64) -> (u64, u64, u64) {
    let shifted = days + 719_468;
    let era = shifted / 146_097;
    let doe = shifted % 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + u64::from(month <= 2);
    (year, month, day)
}

fn create_run_dir(run_id: &str) -> Result<PathBuf> {
    let dir = PathBuf::from("runs").join(run_id);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating run directory: {}", dir.display()))?;
    Ok(dir)
}

fn write_run_info(
    dir: &Path,
    run_id: &str,
    seed: u64,
    content: &GameContent,
    args: &RunArgs,
) -> Result<()> {
    let info = serde_json::json!({
        "run_id": run_id,
        "seed": seed,
        "content_version": content.content_version,
        "runner": "colony_cli",
        "metrics_every": args.metrics_every,
        "args": {
            "ticks": args.ticks,
            "print_every": args.print_every,
            "event_level": args.event_level,
            "resumed_from": args.state_file.as_ref().map(|p| p.display().to_string()),
        }
    });
    let path = dir.join("run_info.json");
    let file =
        std::fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, &info)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Run loop
// ---------------------------------------------------------------------------

fn open_world(
    args: &RunArgs,
    content: GameContent,
    level: EventLevel,
) -> Result<World<ChaCha8Rng>> {
    let world = if let Some(path) = &args.state_file {
        let state = load_state(path, &content)?;
        tracing::info!(path = %path.display(), tick = state.meta.tick, "resuming saved state");
        resume_world(content, state)
    } else {
        let seed = args.seed.unwrap_or_else(rand::random);
        build_world(content, seed)
    };
    Ok(world.with_event_level(level))
}

fn run(args: &RunArgs) -> Result<()> {
    let level = match args.event_level.as_str() {
        "debug" => EventLevel::Debug,
        _ => EventLevel::Normal,
    };
    let content = load_content(&args.content_dir)?;
    let mut world = open_world(args, content, level)?;
    let seed = world.state().meta.seed;

    let mut metrics_writer: Option<MetricsFileWriter> = None;
    if !args.no_metrics {
        let run_id = generate_run_id(seed);
        let run_dir = create_run_dir(&run_id)?;
        write_run_info(&run_dir, &run_id, seed, world.content(), args)?;
        let writer = MetricsFileWriter::new(run_dir.clone())
            .with_context(|| format!("opening metrics CSV in {}", run_dir.display()))?;
        metrics_writer = Some(writer);
        println!("Run directory: {}", run_dir.display());
    }

    let mut autopilot = AutopilotController;
    let print_every = args.print_every.max(1);
    let metrics_every = args.metrics_every.max(1);

    println!(
        "Starting colony: ticks={} seed={seed} bodies={} content_version={}",
        args.ticks,
        world.state().bodies.len(),
        world.content().content_version,
    );
    println!("{}", "-".repeat(80));

    for _ in 0..args.ticks {
        let events = autopilot_tick(&mut world, &mut autopilot);
        report_notable(&events);

        let tick = world.state().meta.tick;
        if tick % print_every == 0 {
            print_status(&world);
        }
        if let Some(writer) = metrics_writer.as_mut() {
            if tick % metrics_every == 0 {
                let snapshot = compute_metrics(world.state(), world.content());
                writer.write_row(&snapshot).context("writing metrics row")?;
            }
        }
    }

    println!("{}", "-".repeat(80));
    println!("Done. Final state at tick {}:", world.state().meta.tick);
    print_status(&world);

    if let Some(writer) = metrics_writer.as_mut() {
        writer.flush().context("final metrics flush")?;
    }
    if let Some(path) = &args.save {
        save_state(path, world.state())?;
        println!("State saved to {}", path.display());
    }
    Ok(())
}

/// Issues this tick's commands from `source` and advances one tick. Ids are
/// drawn from the state's counter so resumed runs never repeat them.
fn autopilot_tick(
    world: &mut World<ChaCha8Rng>,
    source: &mut impl CommandSource,
) -> Vec<EventEnvelope> {
    let mut next_command_id = world.state().counters.next_command_id;
    let commands = source.generate_commands(world.state(), world.content(), &mut next_command_id);
    world.advance_command_counter(next_command_id);
    world.submit(commands);
    world.tick(1)
}

/// Mission outcomes and rejections are printed regardless of `print_every`.
fn report_notable(events: &[EventEnvelope]) {
    for envelope in events {
        match &envelope.event {
            Event::MissionStarted {
                body, kind, cost, ..
            } => println!(
                "*** {} mission to {body} launched for {cost} at tick={:04} ***",
                kind.label(),
                envelope.tick
            ),
            Event::MissionCompleted { body, kind } => println!(
                "*** {} mission to {body} completed at tick={:04} ***",
                kind.label(),
                envelope.tick
            ),
            Event::CommandRejected { command_id, reason } => {
                tracing::warn!(%command_id, %reason, "autopilot command rejected");
            }
            _ => {}
        }
    }
}

fn print_status(world: &World<ChaCha8Rng>) {
    let m = compute_metrics(world.state(), world.content());
    println!(
        "[tick={:05}  year={} day={:03}]  money={:6}  pop={:5}  colonies={}  probed={}  \
         slots={:2}  faults={:2}  energy={}/{}  missions={}",
        m.tick,
        m.year,
        m.day,
        m.money,
        m.system_population,
        m.bodies_colonised,
        m.bodies_probed,
        m.occupied_slots,
        m.faulted_slots,
        m.energy_usage,
        m.energy_capacity,
        m.active_missions,
    );
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(&args)?,
    }
    Ok(())
}
