//! Content loading, validation and world setup shared by the CLI and tests.

use anyhow::{bail, ensure, Context, Result};
use colony_core::{
    BodyDef, BodyKind, BuildingDef, Category, Constants, GameContent, GameState, Requirement,
    World, SCHEMA_VERSION,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Deserialize)]
struct BuildingsFile {
    content_version: String,
    buildings: Vec<BuildingDef>,
}

#[derive(Deserialize)]
struct BodiesFile {
    bodies: Vec<BodyDef>,
}

/// Checks cross-references in loaded content.
///
/// Catches authoring mistakes like a duplicate id, a processor fed by a good
/// nothing produces, or a system without exactly one capital.
pub fn validate_content(content: &GameContent) -> Result<()> {
    validate_constants(&content.constants)?;

    let mut building_ids = HashSet::new();
    for def in &content.buildings {
        ensure!(
            building_ids.insert(def.id.0.as_str()),
            "building id '{}' is defined twice",
            def.id
        );
    }
    let mut body_ids = HashSet::new();
    for body in &content.bodies {
        ensure!(
            body_ids.insert(body.id.0.as_str()),
            "body id '{}' is defined twice",
            body.id
        );
    }

    let capitals: Vec<_> = content.bodies.iter().filter(|b| b.capital).collect();
    match capitals.as_slice() {
        [capital] => ensure!(
            capital.kind != BodyKind::Star,
            "capital '{}' is a star",
            capital.id
        ),
        [] => bail!("no body is flagged as capital"),
        _ => bail!("{} bodies are flagged as capital", capitals.len()),
    }

    let produced: HashSet<&str> = content
        .buildings
        .iter()
        .filter_map(|def| def.output_good.as_deref())
        .collect();
    ensure!(
        produced.contains(content.constants.staple_good.as_str()),
        "staple good '{}' is not produced by any building",
        content.constants.staple_good
    );
    let native: HashSet<&str> = content
        .bodies
        .iter()
        .flat_map(|body| body.resources.keys().map(String::as_str))
        .collect();

    for def in &content.buildings {
        validate_building(def, &produced, &native, &building_ids)?;
    }
    Ok(())
}

fn validate_constants(c: &Constants) -> Result<()> {
    let intervals = [
        ("production_interval_ticks", c.production_interval_ticks),
        ("consumption_interval_ticks", c.consumption_interval_ticks),
        ("mission_interval_ticks", c.mission_interval_ticks),
        ("population_interval_ticks", c.population_interval_ticks),
        ("tax_interval_ticks", c.tax_interval_ticks),
        ("ticks_per_year", c.ticks_per_year),
    ];
    for (name, value) in intervals {
        ensure!(value > 0, "constant '{name}' must be positive");
    }
    ensure!(c.storage_cap > 0, "constant 'storage_cap' must be positive");
    ensure!(
        (0.0..=1.0).contains(&c.salvage_factor),
        "constant 'salvage_factor' must lie in 0..=1, got {}",
        c.salvage_factor
    );
    Ok(())
}

fn validate_building(
    def: &BuildingDef,
    produced: &HashSet<&str>,
    native: &HashSet<&str>,
    building_ids: &HashSet<&str>,
) -> Result<()> {
    match def.category {
        Category::Res => ensure!(
            def.output_good.is_some(),
            "extraction site '{}' has no output good",
            def.id
        ),
        Category::Pro => ensure!(
            def.input_good.is_some() && def.output_good.is_some() && def.input_rate > 0,
            "processor '{}' needs an input good, an input rate and an output good",
            def.id
        ),
        Category::Enr | Category::Dev | Category::Hab => {}
    }
    if def.input_rate > 0 || def.input_good.is_some() {
        let Some(input) = def.input_good.as_deref() else {
            bail!("building '{}' consumes input without naming a good", def.id);
        };
        ensure!(
            produced.contains(input),
            "building '{}' input good '{}' is not produced by any building",
            def.id,
            input
        );
    }
    match &def.requirement {
        Requirement::NativeResource(resource) => ensure!(
            native.contains(resource.as_str()),
            "building '{}' requires resource '{}' that no body has",
            def.id,
            resource
        ),
        Requirement::Good(good) => ensure!(
            produced.contains(good.as_str()),
            "building '{}' requires good '{}' that no building produces",
            def.id,
            good
        ),
        Requirement::Building(other) => ensure!(
            building_ids.contains(other.0.as_str()),
            "building '{}' requires unknown building '{}'",
            def.id,
            other
        ),
        Requirement::None
        | Requirement::Atmosphere
        | Requirement::Sun
        | Requirement::Wind
        | Requirement::MicrowaveLink => {}
    }
    Ok(())
}

pub fn load_content(content_dir: &str) -> Result<GameContent> {
    let dir = Path::new(content_dir);
    let constants: Constants = serde_json::from_str(
        &std::fs::read_to_string(dir.join("constants.json")).context("reading constants.json")?,
    )
    .context("parsing constants.json")?;
    let buildings_file: BuildingsFile = serde_json::from_str(
        &std::fs::read_to_string(dir.join("buildings.json")).context("reading buildings.json")?,
    )
    .context("parsing buildings.json")?;
    let bodies_file: BodiesFile = serde_json::from_str(
        &std::fs::read_to_string(dir.join("bodies.json")).context("reading bodies.json")?,
    )
    .context("parsing bodies.json")?;
    let content = GameContent {
        content_version: buildings_file.content_version,
        buildings: buildings_file.buildings,
        bodies: bodies_file.bodies,
        constants,
    };
    validate_content(&content).with_context(|| format!("validating {}", dir.display()))?;
    Ok(content)
}

/// Fresh world with a ChaCha8 RNG seeded from `seed`.
pub fn build_world(content: GameContent, seed: u64) -> World<ChaCha8Rng> {
    World::new(content, seed, ChaCha8Rng::seed_from_u64(seed))
}

/// Loads a saved state and checks that it belongs to `content`.
pub fn load_state(path: &Path, content: &GameContent) -> Result<GameState> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading state file {}", path.display()))?;
    let state: GameState = serde_json::from_str(&json)
        .with_context(|| format!("parsing state file {}", path.display()))?;
    ensure!(
        state.meta.schema_version == SCHEMA_VERSION,
        "state schema version {} does not match {}",
        state.meta.schema_version,
        SCHEMA_VERSION
    );
    ensure!(
        state.meta.content_version == content.content_version,
        "state was saved with content '{}', loaded content is '{}'",
        state.meta.content_version,
        content.content_version
    );
    Ok(state)
}

/// Resumes a saved run. The RNG is reseeded from the state's seed mixed with
/// its tick, so resuming the same file twice replays identically.
pub fn resume_world(content: GameContent, state: GameState) -> World<ChaCha8Rng> {
    let rng = ChaCha8Rng::seed_from_u64(state.meta.seed ^ state.meta.tick);
    World::from_state(content, state, rng)
}

pub fn save_state(path: &Path, state: &GameState) -> Result<()> {
    let json = serde_json::to_string_pretty(state).context("serializing state")?;
    std::fs::write(path, json).with_context(|| format!("writing state file {}", path.display()))
}
