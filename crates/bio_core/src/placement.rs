//! Grid actions: deploying, moving and attacking with units.
//!
//! Every operation validates against the current player and either returns
//! a new state or the untouched state with a [`Rejection`].

use crate::error::{Rejection, Result};
use crate::factions::PlayerId;
use crate::math::cell_distance;
use crate::outcome::{ensure_running, ActionOutcome, Attempt};
use crate::resources::Resources;
use crate::state::GameState;
use crate::unit_kind::{stats_of, UnitType};
use crate::zone::{UnitInstance, Zone, ZoneGrid, ZoneId};

/// Grid coordinate `(row, col)`.
pub type Cell = (u32, u32);

/// Check whether `player` may deploy `unit_type` at `(row, col)`.
///
/// Checks run in a fixed order and the first failure is reported: bounds,
/// occupancy, faction, then affordability across all four resources.
///
/// # Errors
///
/// Returns the [`Rejection`] of the first failed check.
pub fn can_place_unit(
    zone: &Zone,
    row: u32,
    col: u32,
    unit_type: UnitType,
    player: PlayerId,
    resources: &Resources,
) -> std::result::Result<(), Rejection> {
    check_bounds((row, col))?;
    if !zone.grid.is_empty(row, col) {
        return Err(Rejection::CellOccupied);
    }
    if unit_type.faction() != player.faction() {
        return Err(Rejection::WrongFaction { unit_type, player });
    }
    if let Some((resource, required, available)) =
        resources.first_shortfall(&stats_of(unit_type).cost)
    {
        return Err(Rejection::InsufficientResources {
            resource,
            required,
            available,
        });
    }
    Ok(())
}

/// Deploy a unit for the current player.
///
/// On success the cell holds a full-health unit owned by the current player
/// and the unit's cost vector is deducted from that player's pool.
///
/// # Errors
///
/// Returns [`GameError::ZoneNotFound`](crate::error::GameError::ZoneNotFound)
/// for an unknown zone id.
pub fn place_unit(
    state: &GameState,
    zone_id: ZoneId,
    row: u32,
    col: u32,
    unit_type: UnitType,
) -> Result<ActionOutcome> {
    ActionOutcome::resolve(state, try_place(state, zone_id, row, col, unit_type))
}

fn try_place(state: &GameState, zone_id: ZoneId, row: u32, col: u32, unit_type: UnitType) -> Attempt {
    ensure_running(state)?;
    let player = state.current_player;
    let zone = state.zone(zone_id)?;
    can_place_unit(zone, row, col, unit_type, player, state.resources_of(player))?;

    let mut next = state.clone();
    next.zone_mut(zone_id)?
        .grid
        .set(row, col, Some(UnitInstance::spawn(unit_type, player)));
    let pool = next.resources_of_mut(player);
    *pool = pool.saturating_sub(stats_of(unit_type).cost);

    tracing::debug!(%player, zone = %zone_id, row, col, ?unit_type, "Unit placed");
    Ok(next)
}

/// Move one of the current player's units within a zone.
///
/// The destination must be empty and within the unit's movement range
/// (Manhattan distance).
///
/// # Errors
///
/// Returns [`GameError::ZoneNotFound`](crate::error::GameError::ZoneNotFound)
/// for an unknown zone id.
pub fn move_unit(state: &GameState, zone_id: ZoneId, from: Cell, to: Cell) -> Result<ActionOutcome> {
    ActionOutcome::resolve(state, try_move(state, zone_id, from, to))
}

fn try_move(state: &GameState, zone_id: ZoneId, from: Cell, to: Cell) -> Attempt {
    ensure_running(state)?;
    let zone = state.zone(zone_id)?;
    check_bounds(from)?;
    check_bounds(to)?;
    let unit = own_unit(zone, from, state.current_player)?;
    if !zone.grid.is_empty(to.0, to.1) {
        return Err(Rejection::CellOccupied.into());
    }
    check_range(unit, from, to)?;

    let mut next = state.clone();
    let grid = &mut next.zone_mut(zone_id)?.grid;
    let moving = grid.take(from.0, from.1);
    grid.set(to.0, to.1, moving);

    tracing::debug!(zone = %zone_id, ?from, ?to, "Unit moved");
    Ok(next)
}

/// Strike an enemy unit within range.
///
/// Damage is the attacker's attack minus the zone's effective defense,
/// floored at zero. A unit reduced to zero health is removed.
///
/// # Errors
///
/// Returns [`GameError::ZoneNotFound`](crate::error::GameError::ZoneNotFound)
/// for an unknown zone id.
pub fn attack_position(
    state: &GameState,
    zone_id: ZoneId,
    attacker: Cell,
    target: Cell,
) -> Result<ActionOutcome> {
    ActionOutcome::resolve(state, try_attack(state, zone_id, attacker, target))
}

fn try_attack(state: &GameState, zone_id: ZoneId, attacker: Cell, target: Cell) -> Attempt {
    ensure_running(state)?;
    let player = state.current_player;
    let zone = state.zone(zone_id)?;
    check_bounds(attacker)?;
    check_bounds(target)?;
    let unit = own_unit(zone, attacker, player)?;
    match zone.grid.get(target.0, target.1) {
        Some(victim) if victim.owner != player => {}
        _ => return Err(Rejection::NoEnemyTarget.into()),
    }
    check_range(unit, attacker, target)?;

    let damage = attack_damage(unit, zone);
    let mut next = state.clone();
    let grid = &mut next.zone_mut(zone_id)?.grid;
    let destroyed = match grid.get_mut(target.0, target.1) {
        Some(victim) => {
            victim.health = victim.health.saturating_sub(damage);
            victim.health == 0
        }
        None => false,
    };
    if destroyed {
        grid.take(target.0, target.1);
    }

    tracing::debug!(zone = %zone_id, ?attacker, ?target, damage, destroyed, "Attack resolved");
    Ok(next)
}

/// Damage `unit` deals to anything standing in `zone`.
#[must_use]
pub fn attack_damage(unit: &UnitInstance, zone: &Zone) -> u16 {
    stats_of(unit.unit_type)
        .stats
        .attack
        .saturating_sub(zone.effective_defense())
}

pub(crate) fn check_bounds((row, col): Cell) -> std::result::Result<(), Rejection> {
    if ZoneGrid::in_bounds(row, col) {
        Ok(())
    } else {
        Err(Rejection::OutOfBounds { row, col })
    }
}

/// Unit at `cell` if it belongs to `player`.
pub(crate) fn own_unit(
    zone: &Zone,
    cell: Cell,
    player: PlayerId,
) -> std::result::Result<&UnitInstance, Rejection> {
    let unit = zone.grid.get(cell.0, cell.1).ok_or(Rejection::NoUnitAtCell)?;
    if unit.owner == player {
        Ok(unit)
    } else {
        Err(Rejection::NotOwnUnit)
    }
}

fn check_range(unit: &UnitInstance, from: Cell, to: Cell) -> std::result::Result<(), Rejection> {
    let distance = cell_distance(from, to);
    let range = u32::from(stats_of(unit.unit_type).stats.movement_range);
    if distance > range {
        return Err(Rejection::OutOfRange { distance, range });
    }
    Ok(())
}
