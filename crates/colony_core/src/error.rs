use crate::{BodyId, BuildingId, Category, MissionKind, SlotIndex};

/// Validation failures from construction, salvage and missions.
///
/// Returning one of these guarantees nothing was mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColonyError {
    #[error("unknown body '{body}'")]
    UnknownBody { body: BodyId },

    #[error("no {category} building '{building}' in the catalog")]
    UnknownBuilding {
        category: Category,
        building: BuildingId,
    },

    #[error("body '{body}' is not colonised")]
    BodyNotColonised { body: BodyId },

    #[error("slot {category}{slot} on '{body}' is already occupied")]
    SlotOccupied {
        body: BodyId,
        category: Category,
        slot: SlotIndex,
    },

    #[error("slot {category}{slot} on '{body}' is empty")]
    SlotEmpty {
        body: BodyId,
        category: Category,
        slot: SlotIndex,
    },

    #[error("not enough money: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("not sufficient energy: need {needed}, {available} available")]
    InsufficientEnergy { needed: u32, available: u32 },

    #[error("'{body}' lacks {requirement} needed by '{building}'")]
    MissingResourcePrecondition {
        body: BodyId,
        building: BuildingId,
        requirement: String,
    },

    #[error("salvaging would leave {capacity_after} energy capacity for {usage} usage")]
    EnergyWouldUnderflow { capacity_after: u32, usage: u32 },

    #[error("'{body}' cannot be targeted by a mission")]
    InvalidMissionTarget { body: BodyId },

    #[error("'{body}' is already probed")]
    AlreadyProbed { body: BodyId },

    #[error("'{body}' must be probed first")]
    NotProbed { body: BodyId },

    #[error("'{body}' is already colonised")]
    AlreadyColonised { body: BodyId },

    #[error("a {} mission to '{body}' is already running", .kind.label())]
    MissionInProgress { body: BodyId, kind: MissionKind },
}
