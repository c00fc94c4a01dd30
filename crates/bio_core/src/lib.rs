//! # Bio Commander Core
//!
//! Deterministic rules engine for Bio Commander, a turn-based strategy game
//! where the immune system and a pathogen fight over the zones of a body.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No system randomness
//! - No floating-point math (uses fixed-point and integer percentages)
//!
//! Every operation takes a [`GameState`](state::GameState) by reference and
//! returns a new one, which enables:
//! - Undo/redo by keeping snapshots
//! - Replays verified by state hash
//! - Determinism testing
//!
//! ## Crate Structure
//!
//! - [`unit_kind`] - Unit catalog
//! - [`zone`] / [`map`] - Zone grids and zone connectivity
//! - [`placement`] / [`abilities`] - Unit actions
//! - [`economy`] - Per-turn income
//! - [`turn`] - Turn progression
//! - [`expansion`] - Territorial expansion
//! - [`victory`] - Victory evaluation
//! - [`action`] - Action requests and [`apply_action`](action::apply_action)
//! - [`history`] / [`replay`] - Undo/redo and recorded games
//! - [`config`] / [`scenario`] - Rules and starting layouts loaded from RON

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod abilities;
pub mod action;
pub mod config;
pub mod economy;
pub mod error;
pub mod expansion;
pub mod factions;
pub mod history;
pub mod map;
pub mod math;
pub mod outcome;
pub mod placement;
pub mod replay;
pub mod resources;
pub mod scenario;
pub mod state;
pub mod turn;
pub mod unit_kind;
pub mod victory;
pub mod zone;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::abilities::use_special_ability;
    pub use crate::action::{apply_action, apply_all, Action};
    pub use crate::config::RulesConfig;
    pub use crate::economy::generate_resources;
    pub use crate::error::{GameError, Rejection, Result};
    pub use crate::expansion::{expand_zone, ExpansionKind, ExpansionRequest};
    pub use crate::factions::{Faction, Owner, PlayerId};
    pub use crate::history::History;
    pub use crate::math::{Fixed, MapPos};
    pub use crate::outcome::ActionOutcome;
    pub use crate::placement::{attack_position, can_place_unit, move_unit, place_unit, Cell};
    pub use crate::replay::{Replay, ReplayPlayer};
    pub use crate::resources::{ResourceKind, Resources};
    pub use crate::scenario::{Scenario, UnitSeed, ZoneSeed};
    pub use crate::state::{GamePhase, GameState};
    pub use crate::turn::{end_turn, switch_player};
    pub use crate::unit_kind::{stats_of, SpecialAbility, UnitInfo, UnitStats, UnitType};
    pub use crate::victory::{check_victory_conditions, VictoryReason, VictoryResult};
    pub use crate::zone::{Direction, UnitInstance, Zone, ZoneGrid, ZoneId, ZoneType, GRID_SIZE};
}
