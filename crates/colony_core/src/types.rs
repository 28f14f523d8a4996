//! Type definitions for `colony_core`.
//!
//! Content definitions, ledger records, commands, events and ID newtypes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ledger::Ledger;
use crate::scheduler::Scheduler;

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

pub type GoodId = String;
pub type ResourceId = String;

// ---------------------------------------------------------------------------
// ID newtypes
// ---------------------------------------------------------------------------

macro_rules! string_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(BodyId);
string_id!(BuildingId);
string_id!(MessageId);
string_id!(CommandId);
string_id!(EventId);

// ---------------------------------------------------------------------------
// Core enums
// ---------------------------------------------------------------------------

/// Building category. Each body has five slots per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "RES")]
    Res,
    #[serde(rename = "PRO")]
    Pro,
    #[serde(rename = "ENR")]
    Enr,
    #[serde(rename = "DEV")]
    Dev,
    #[serde(rename = "HAB")]
    Hab,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Res,
        Category::Pro,
        Category::Enr,
        Category::Dev,
        Category::Hab,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Category::Res => "RES",
            Category::Pro => "PRO",
            Category::Enr => "ENR",
            Category::Dev => "DEV",
            Category::Hab => "HAB",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

pub const SLOTS_PER_CATEGORY: u8 = 5;

/// Slot position within a category, always in `1..=SLOTS_PER_CATEGORY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SlotIndex(u8);

impl SlotIndex {
    pub fn new(index: u8) -> Option<Self> {
        (1..=SLOTS_PER_CATEGORY)
            .contains(&index)
            .then_some(SlotIndex(index))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = SlotIndex> {
        (1..=SLOTS_PER_CATEGORY).map(SlotIndex)
    }
}

impl TryFrom<u8> for SlotIndex {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        SlotIndex::new(index)
            .ok_or_else(|| format!("slot index {index} outside 1..={SLOTS_PER_CATEGORY}"))
    }
}

impl From<SlotIndex> for u8 {
    fn from(slot: SlotIndex) -> u8 {
        slot.0
    }
}

impl std::fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one build site: the only handle a scheduled job keeps on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub body: BodyId,
    pub category: Category,
    pub slot: SlotIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Abundance {
    Common,
    Normal,
    Rare,
}

impl Abundance {
    pub fn yield_multiplier(self) -> f64 {
        match self {
            Abundance::Common => 2.0,
            Abundance::Normal => 1.0,
            Abundance::Rare => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    Star,
    Planet,
    Moon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MissionKind {
    Probe,
    Colonise,
}

impl MissionKind {
    pub fn label(self) -> &'static str {
        match self {
            MissionKind::Probe => "probe",
            MissionKind::Colonise => "colonise",
        }
    }

    pub(crate) fn message_id(self) -> MessageId {
        MessageId(self.label().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventLevel {
    Normal,
    Debug,
}

// ---------------------------------------------------------------------------
// Content types
// ---------------------------------------------------------------------------

/// Precondition attached to a building definition.
///
/// Only `Atmosphere` and `NativeResource` gate construction (RES buildings).
/// The remaining kinds describe fuel or placement and are informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Requirement {
    #[default]
    None,
    Atmosphere,
    Sun,
    Wind,
    MicrowaveLink,
    NativeResource(ResourceId),
    Good(GoodId),
    Building(BuildingId),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingDef {
    pub id: BuildingId,
    pub name: String,
    pub category: Category,
    pub price: u64,
    /// Nominal construction time. Construction completes immediately.
    pub build_ticks: u64,
    #[serde(default)]
    pub energy_drain: u32,
    #[serde(default)]
    pub requirement: Requirement,
    #[serde(default)]
    pub input_good: Option<GoodId>,
    #[serde(default)]
    pub input_rate: u32,
    #[serde(default)]
    pub output_good: Option<GoodId>,
    /// Goods per run for RES/PRO, energy capacity for ENR, habitation for HAB.
    #[serde(default)]
    pub output_rate: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirement_text: String,
    #[serde(default)]
    pub yield_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Planar distance rounded to three decimals.
    pub fn distance_to(self, other: Position) -> f64 {
        let d = (self.x - other.x).hypot(self.y - other.y);
        (d * 1000.0).round() / 1000.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyDef {
    pub id: BodyId,
    pub name: String,
    pub kind: BodyKind,
    pub scale: f64,
    pub orbital_distance: f64,
    pub position: Position,
    #[serde(default)]
    pub atmosphere: bool,
    #[serde(default)]
    pub wind_level: u32,
    #[serde(default)]
    pub resources: BTreeMap<ResourceId, Abundance>,
    #[serde(default)]
    pub probed: bool,
    #[serde(default)]
    pub colonised: bool,
    #[serde(default)]
    pub capital: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constants {
    pub starting_money: u64,
    pub storage_cap: u32,
    pub salvage_factor: f64,
    pub tax_factor: f64,
    pub food_consumption_factor: f64,
    pub staple_good: GoodId,
    pub production_interval_ticks: u64,
    pub consumption_interval_ticks: u64,
    pub mission_interval_ticks: u64,
    pub population_interval_ticks: u64,
    pub tax_interval_ticks: u64,
    pub capital_population: u32,
    pub capital_habitation_capacity: u32,
    pub probe_base_cost: u64,
    pub probe_cost_per_distance: f64,
    pub probe_ticks_per_distance: f64,
    pub colonise_base_cost: u64,
    pub colonise_cost_per_distance: f64,
    pub colonise_ticks_per_distance: f64,
    pub ticks_per_year: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameContent {
    pub content_version: String,
    pub buildings: Vec<BuildingDef>,
    pub bodies: Vec<BodyDef>,
    pub constants: Constants,
}

// ---------------------------------------------------------------------------
// State types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub meta: MetaState,
    pub economy: EconomyState,
    /// First colonised body; mission distances are measured from here.
    pub capital: Option<BodyId>,
    pub bodies: Ledger,
    pub scheduler: Scheduler,
    pub counters: Counters,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaState {
    pub tick: u64,
    pub seed: u64,
    pub schema_version: u32,
    pub content_version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EconomyState {
    pub money: u64,
    pub system_population: u64,
    pub year: u64,
    pub day: u64,
    pub ticks_since_tax: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Counters {
    pub next_event_id: u64,
    pub next_command_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CelestialBody {
    pub id: BodyId,
    pub name: String,
    pub kind: BodyKind,
    pub scale: f64,
    pub orbital_distance: f64,
    pub position: Position,
    pub atmosphere: bool,
    pub wind_level: u32,
    pub resources: BTreeMap<ResourceId, Abundance>,
    pub energy_capacity: u32,
    pub energy_usage: u32,
    pub habitation_capacity: u32,
    pub population: u32,
    pub goods: BTreeMap<GoodId, u32>,
    pub probed: bool,
    pub colonised: bool,
    /// Occupied slots only; an absent entry is an empty slot.
    pub slots: BTreeMap<Category, BTreeMap<SlotIndex, SlotOccupant>>,
    pub messages: BTreeMap<MessageId, Message>,
}

impl CelestialBody {
    pub fn occupant(&self, category: Category, slot: SlotIndex) -> Option<&SlotOccupant> {
        self.slots.get(&category).and_then(|slots| slots.get(&slot))
    }

    pub(crate) fn occupant_mut(
        &mut self,
        category: Category,
        slot: SlotIndex,
    ) -> Option<&mut SlotOccupant> {
        self.slots
            .get_mut(&category)
            .and_then(|slots| slots.get_mut(&slot))
    }

    pub fn stock(&self, good: &str) -> u32 {
        self.goods.get(good).copied().unwrap_or(0)
    }

    pub fn occupied_slots(&self) -> impl Iterator<Item = (Category, SlotIndex, &SlotOccupant)> {
        self.slots.iter().flat_map(|(category, slots)| {
            slots
                .iter()
                .map(move |(slot, occupant)| (*category, *slot, occupant))
        })
    }

    pub fn active_mission(&self) -> Option<MissionKind> {
        [MissionKind::Probe, MissionKind::Colonise]
            .into_iter()
            .find(|kind| self.messages.contains_key(&kind.message_id()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotOccupant {
    pub building: BuildingId,
    pub fault: Option<Fault>,
    /// Display-only counters.
    pub workers: u32,
    pub output: u64,
}

impl SlotOccupant {
    pub fn new(building: BuildingId) -> Self {
        Self {
            building,
            fault: None,
            workers: 0,
            output: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultKind {
    EnergyShortage,
    StorageFull,
    MissingInput { good: GoodId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    pub kind: FaultKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    Info,
    Fault,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
    /// Countdown for mission messages; `None` for fault messages.
    pub remaining_ticks: Option<u64>,
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub id: CommandId,
    pub issued_tick: u64,
    pub execute_at_tick: u64,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Construct {
        body: BodyId,
        category: Category,
        slot: SlotIndex,
        building: BuildingId,
    },
    Salvage {
        body: BodyId,
        category: Category,
        slot: SlotIndex,
    },
    Probe {
        body: BodyId,
    },
    Colonise {
        body: BodyId,
    },
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: EventId,
    pub tick: u64,
    pub event: Event,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    BuildingConstructed {
        body: BodyId,
        category: Category,
        slot: SlotIndex,
        building: BuildingId,
    },
    BuildingSalvaged {
        body: BodyId,
        category: Category,
        slot: SlotIndex,
        building: BuildingId,
        refund: u64,
    },
    /// Emitted only when a slot's fault state changes.
    FaultChanged {
        body: BodyId,
        category: Category,
        slot: SlotIndex,
        fault: Option<FaultKind>,
        text: Option<String>,
    },
    MissionStarted {
        body: BodyId,
        kind: MissionKind,
        cost: u64,
        remaining_ticks: u64,
    },
    MissionProgress {
        body: BodyId,
        kind: MissionKind,
        remaining_ticks: u64,
    },
    MissionCompleted {
        body: BodyId,
        kind: MissionKind,
    },
    /// Only emitted at `EventLevel::Debug`.
    PopulationChanged {
        body: BodyId,
        population: u32,
    },
    AggregatesUpdated {
        money: u64,
        system_population: u64,
        year: u64,
        day: u64,
    },
    CommandRejected {
        command_id: CommandId,
        reason: String,
    },
}
