//! Shared test fixtures for colony_core and downstream crates.
//!
//! `base_content()` is a trimmed catalog (one or two buildings per category)
//! and a four-body system: a star, the capital `earth` at (10, 0), an
//! unprobed `rock` exactly 3 units away, and a probed `moon` 4 units away.

use crate::{
    initial_state, Abundance, BodyDef, BodyId, BodyKind, BuildingDef, BuildingId, Category,
    Constants, GameContent, GameState, Position, Requirement, World,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

pub fn base_constants() -> Constants {
    Constants {
        starting_money: 2000,
        storage_cap: 1000,
        salvage_factor: 0.75,
        tax_factor: 0.1,
        food_consumption_factor: 0.75,
        staple_good: "Vegetable crates".to_string(),
        production_interval_ticks: 3,
        consumption_interval_ticks: 3,
        mission_interval_ticks: 1,
        population_interval_ticks: 3,
        tax_interval_ticks: 2,
        capital_population: 100,
        capital_habitation_capacity: 100,
        probe_base_cost: 500,
        probe_cost_per_distance: 67.0,
        probe_ticks_per_distance: 2.0,
        colonise_base_cost: 3900,
        colonise_cost_per_distance: 123.0,
        colonise_ticks_per_distance: 4.0,
        ticks_per_year: 900,
    }
}

struct Io<'a> {
    input: Option<(&'a str, u32)>,
    output: Option<&'a str>,
    output_rate: u32,
}

fn building(
    id: &str,
    category: Category,
    price: u64,
    energy_drain: u32,
    requirement: Requirement,
    io: Io<'_>,
) -> BuildingDef {
    BuildingDef {
        id: BuildingId(id.to_string()),
        name: id.replace('_', " "),
        category,
        price,
        build_ticks: 60,
        energy_drain,
        requirement,
        input_good: io.input.map(|(good, _)| good.to_string()),
        input_rate: io.input.map_or(0, |(_, rate)| rate),
        output_good: io.output.map(str::to_string),
        output_rate: io.output_rate,
        description: String::new(),
        requirement_text: String::new(),
        yield_text: String::new(),
    }
}

pub fn base_buildings() -> Vec<BuildingDef> {
    vec![
        building(
            "organic_farm",
            Category::Res,
            250,
            200,
            Requirement::Atmosphere,
            Io { input: None, output: Some("Vegetable crates"), output_rate: 20 },
        ),
        building(
            "coal_drill",
            Category::Res,
            300,
            100,
            Requirement::NativeResource("Coal".to_string()),
            Io { input: None, output: Some("Coal sacks"), output_rate: 10 },
        ),
        building(
            "iron_mine",
            Category::Res,
            450,
            150,
            Requirement::NativeResource("Iron".to_string()),
            Io { input: None, output: Some("Iron ingots"), output_rate: 15 },
        ),
        building(
            "weapon_forge",
            Category::Pro,
            500,
            250,
            Requirement::Good("Iron ingots".to_string()),
            Io { input: Some(("Iron ingots", 10)), output: Some("Weapons"), output_rate: 10 },
        ),
        building(
            "wind_turbine",
            Category::Enr,
            150,
            0,
            Requirement::Wind,
            Io { input: None, output: None, output_rate: 150 },
        ),
        building(
            "coal_generator",
            Category::Enr,
            300,
            0,
            Requirement::Good("Coal sacks".to_string()),
            Io { input: Some(("Coal sacks", 5)), output: None, output_rate: 500 },
        ),
        building(
            "trading_center",
            Category::Dev,
            575,
            450,
            Requirement::None,
            Io { input: None, output: None, output_rate: 0 },
        ),
        building(
            "pod_settlement",
            Category::Hab,
            120,
            120,
            Requirement::None,
            Io { input: None, output: None, output_rate: 100 },
        ),
    ]
}

fn body(id: &str, kind: BodyKind, x: f64, y: f64) -> BodyDef {
    BodyDef {
        id: BodyId(id.to_string()),
        name: id.to_string(),
        kind,
        scale: 1.0,
        orbital_distance: x.hypot(y) / 10.0,
        position: Position { x, y },
        atmosphere: false,
        wind_level: 0,
        resources: BTreeMap::new(),
        probed: false,
        colonised: false,
        capital: false,
    }
}

pub fn base_bodies() -> Vec<BodyDef> {
    let sun = body("sun", BodyKind::Star, 0.0, 0.0);
    let earth = BodyDef {
        atmosphere: true,
        wind_level: 1,
        resources: BTreeMap::from([
            ("Coal".to_string(), Abundance::Common),
            ("Iron".to_string(), Abundance::Normal),
        ]),
        capital: true,
        ..body("earth", BodyKind::Planet, 10.0, 0.0)
    };
    let rock = BodyDef {
        resources: BTreeMap::from([("Iron".to_string(), Abundance::Rare)]),
        ..body("rock", BodyKind::Planet, 13.0, 0.0)
    };
    let moon = BodyDef {
        resources: BTreeMap::from([("Coal".to_string(), Abundance::Common)]),
        probed: true,
        ..body("moon", BodyKind::Moon, 10.0, 4.0)
    };
    vec![sun, earth, rock, moon]
}

pub fn base_content() -> GameContent {
    GameContent {
        content_version: "test".to_string(),
        buildings: base_buildings(),
        bodies: base_bodies(),
        constants: base_constants(),
    }
}

pub fn base_state(content: &GameContent) -> GameState {
    initial_state(content, 42)
}

pub fn make_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

pub fn base_world() -> World<ChaCha8Rng> {
    World::new(base_content(), 42, make_rng())
}
