//! Action requests and the single entry point that applies them.

use serde::{Deserialize, Serialize};

use crate::abilities::use_special_ability;
use crate::error::{Rejection, Result};
use crate::expansion::{expand_zone, ExpansionRequest};
use crate::outcome::ActionOutcome;
use crate::placement::{attack_position, move_unit, place_unit, Cell};
use crate::state::GameState;
use crate::turn::end_turn;
use crate::unit_kind::UnitType;
use crate::zone::ZoneId;

/// Everything a player can ask the engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Deploy a unit.
    SpawnUnit {
        /// Zone to deploy into.
        zone: ZoneId,
        /// Target row.
        row: u32,
        /// Target column.
        col: u32,
        /// Unit to deploy.
        unit_type: UnitType,
    },
    /// Move a unit inside a zone.
    MoveUnit {
        /// Zone containing the unit.
        zone: ZoneId,
        /// Current cell.
        from: Cell,
        /// Destination cell.
        to: Cell,
    },
    /// Attack an enemy unit.
    AttackPosition {
        /// Zone of the fight.
        zone: ZoneId,
        /// Attacking unit's cell.
        attacker: Cell,
        /// Target cell.
        target: Cell,
    },
    /// Activate a unit ability.
    UseSpecialAbility {
        /// Zone containing the unit.
        zone: ZoneId,
        /// Unit's cell.
        cell: Cell,
        /// Ability slot.
        slot: u8,
    },
    /// Finish the current turn.
    EndTurn,
    /// Expand territory.
    ExpandZone(ExpansionRequest),
    /// Highlight a zone for the presentation layer.
    SelectZone(ZoneId),
}

/// Validate and apply one action.
///
/// Once a winner exists every action is rejected with
/// [`Rejection::GameOver`]. Victory is evaluated after every applied action.
///
/// # Errors
///
/// Returns [`GameError::ZoneNotFound`](crate::error::GameError::ZoneNotFound)
/// when the action names a zone that does not exist.
pub fn apply_action(state: &GameState, action: &Action) -> Result<ActionOutcome> {
    if state.is_over() {
        return Ok(ActionOutcome::rejected(state, Rejection::GameOver));
    }

    let outcome = match *action {
        Action::SpawnUnit {
            zone,
            row,
            col,
            unit_type,
        } => place_unit(state, zone, row, col, unit_type)?,
        Action::MoveUnit { zone, from, to } => move_unit(state, zone, from, to)?,
        Action::AttackPosition {
            zone,
            attacker,
            target,
        } => attack_position(state, zone, attacker, target)?,
        Action::UseSpecialAbility { zone, cell, slot } => {
            use_special_ability(state, zone, cell, slot)?
        }
        Action::EndTurn => end_turn(state),
        Action::ExpandZone(ref request) => expand_zone(state, request)?,
        Action::SelectZone(zone) => ActionOutcome::applied(state.with_selected_zone(zone)?),
    };

    if outcome.is_applied() {
        tracing::debug!(player = %state.current_player, ?action, "Action applied");
    }
    Ok(outcome)
}

/// Apply actions in order, stopping at the first error.
///
/// Rejected actions leave the state unchanged and do not stop the run.
///
/// # Errors
///
/// Propagates the first [`GameError`](crate::error::GameError).
pub fn apply_all<'a, I>(state: &GameState, actions: I) -> Result<GameState>
where
    I: IntoIterator<Item = &'a Action>,
{
    let mut current = state.clone();
    for action in actions {
        current = apply_action(&current, action)?.state;
    }
    Ok(current)
}
