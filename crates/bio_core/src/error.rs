//! Error types for the rules engine.
//!
//! Two families exist side by side:
//!
//! - [`GameError`] reports invariant violations (a zone id that does not
//!   exist, an out-of-range unit-type index) and infrastructure failures
//!   (serialization, configuration parsing, file IO). These surface as `Err`.
//! - [`Rejection`] reports an ordinary illegal move. Rejections never abort:
//!   the engine hands back the unchanged state together with the reason.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::factions::{Faction, PlayerId};
use crate::resources::ResourceKind;
use crate::unit_kind::UnitType;
use crate::zone::ZoneId;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for invariant violations and infrastructure failures.
#[derive(Debug, Error)]
pub enum GameError {
    /// Referenced zone does not exist.
    #[error("Zone not found: {0}")]
    ZoneNotFound(ZoneId),

    /// Unit-type index outside the catalog.
    #[error("Unknown unit type index: {0}")]
    UnknownUnitType(u8),

    /// Zone-type index outside the zone type table.
    #[error("Unknown zone type index: {0}")]
    UnknownZoneType(u8),

    /// The game state breaks a structural invariant.
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Snapshot encoding or decoding failed.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Configuration or scenario parse error.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    /// Filesystem error while loading or saving.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Replaying a recorded game produced a different final state.
    #[error("Replay diverged: expected hash {expected}, got {actual}")]
    ReplayMismatch {
        /// Hash stored in the replay.
        expected: u64,
        /// Hash produced by re-applying the actions.
        actual: u64,
    },
}

/// Why an action was refused.
///
/// The `Display` text is the human-readable reason handed to the
/// presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum Rejection {
    /// The game already has a winner.
    #[error("the game is over")]
    GameOver,

    /// Row or column outside the zone grid.
    #[error("position ({row}, {col}) is outside the zone grid")]
    OutOfBounds {
        /// Requested row.
        row: u32,
        /// Requested column.
        col: u32,
    },

    /// Target cell already holds a unit.
    #[error("cell is already occupied")]
    CellOccupied,

    /// Unit type belongs to the other faction.
    #[error("wrong faction: {unit_type:?} cannot be deployed by player {player}")]
    WrongFaction {
        /// Requested unit type.
        unit_type: UnitType,
        /// Acting player.
        player: PlayerId,
    },

    /// Not enough of one resource.
    #[error("insufficient {resource}: need {required}, have {available}")]
    InsufficientResources {
        /// First resource found short.
        resource: ResourceKind,
        /// Amount required.
        required: u32,
        /// Amount available.
        available: u32,
    },

    /// No unit at the given cell.
    #[error("no unit at the selected cell")]
    NoUnitAtCell,

    /// The unit belongs to the other player.
    #[error("unit belongs to the opponent")]
    NotOwnUnit,

    /// Attack target is empty or friendly.
    #[error("no enemy unit at the target cell")]
    NoEnemyTarget,

    /// Distance exceeds the unit's range.
    #[error("target is {distance} cells away, range is {range}")]
    OutOfRange {
        /// Manhattan distance to the target.
        distance: u32,
        /// Unit movement range.
        range: u32,
    },

    /// Ability slot is empty for this unit.
    #[error("unit has no ability in slot {0}")]
    NoAbilityInSlot(u8),

    /// The ability has no active effect.
    #[error("ability is passive and cannot be activated")]
    PassiveAbility,

    /// Replication needs an empty neighbouring cell.
    #[error("no free neighbouring cell")]
    NoFreeNeighbour,

    /// The acting player does not hold the source zone.
    #[error("source zone is not held by the acting player")]
    SourceNotHeld,

    /// Source zone is not a border zone.
    #[error("source zone is not a border zone")]
    NotBorderZone,

    /// Source and target zones are not connected.
    #[error("zones are not adjacent")]
    NotAdjacent,

    /// Expansion kind reserved for the other faction.
    #[error("{faction} cannot perform this expansion")]
    ExpansionNotAllowed {
        /// Faction of the acting player.
        faction: Faction,
    },

    /// Target zone already belongs to the actor.
    #[error("target zone is already controlled by the acting player")]
    AlreadyControlled,

    /// Conquest target is not held by the opponent.
    #[error("target zone is not held by the enemy")]
    TargetNotEnemy,

    /// Every connection slot of the source zone is used or blocked.
    #[error("source zone has no free connection")]
    NoFreeConnection,

    /// Zone cap reached.
    #[error("maximum number of zones ({0}) reached")]
    MaxZonesReached(usize),
}
