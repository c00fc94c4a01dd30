//! Special ability activation.
//!
//! Four abilities have an active effect; the rest describe passive traits
//! and refuse activation with [`Rejection::PassiveAbility`].

use crate::error::{Rejection, Result};
use crate::outcome::{ensure_running, ActionOutcome, Attempt};
use crate::placement::{check_bounds, own_unit, Cell};
use crate::resources::Resources;
use crate::state::GameState;
use crate::unit_kind::{stats_of, SpecialAbility};
use crate::zone::{Direction, UnitInstance, ZoneGrid, ZoneId, ZONE_POOL_CAP};

/// Antibodies granted by [`SpecialAbility::AntibodyProduction`].
pub const ANTIBODY_YIELD: u32 = 50;
/// Health restored by [`SpecialAbility::Phagocytosis`].
pub const PHAGOCYTOSIS_HEAL: u16 = 20;
/// Player resources recovered by [`SpecialAbility::Phagocytosis`].
pub const PHAGOCYTOSIS_YIELD: Resources = Resources::new(10, 0, 0, 5);
/// Zone pool restored by [`SpecialAbility::ZoneHealing`].
pub const ZONE_HEALING_YIELD: Resources = Resources::new(50, 0, 0, 30);

/// Activate the ability in `slot` of the current player's unit at `cell`.
///
/// # Errors
///
/// Returns [`GameError::ZoneNotFound`](crate::error::GameError::ZoneNotFound)
/// for an unknown zone id.
pub fn use_special_ability(
    state: &GameState,
    zone_id: ZoneId,
    cell: Cell,
    slot: u8,
) -> Result<ActionOutcome> {
    ActionOutcome::resolve(state, try_ability(state, zone_id, cell, slot))
}

fn try_ability(state: &GameState, zone_id: ZoneId, cell: Cell, slot: u8) -> Attempt {
    ensure_running(state)?;
    let player = state.current_player;
    let zone = state.zone(zone_id)?;
    check_bounds(cell)?;
    let unit = *own_unit(zone, cell, player)?;
    let ability = stats_of(unit.unit_type)
        .ability(slot)
        .ok_or(Rejection::NoAbilityInSlot(slot))?;

    let mut next = state.clone();
    match ability {
        SpecialAbility::AntibodyProduction => {
            *next.resources_of_mut(player) += Resources::new(0, ANTIBODY_YIELD, 0, 0);
        }
        SpecialAbility::Phagocytosis => {
            if let Some(healed) = next.zone_mut(zone_id)?.grid.get_mut(cell.0, cell.1) {
                healed.health = healed
                    .health
                    .saturating_add(PHAGOCYTOSIS_HEAL)
                    .min(healed.max_health());
            }
            *next.resources_of_mut(player) += PHAGOCYTOSIS_YIELD;
        }
        SpecialAbility::Replication => {
            let grid = &mut next.zone_mut(zone_id)?.grid;
            let (row, col) = free_neighbour(grid, cell).ok_or(Rejection::NoFreeNeighbour)?;
            grid.set(row, col, Some(UnitInstance::spawn(unit.unit_type, player)));
        }
        SpecialAbility::ZoneHealing => {
            let zone = next.zone_mut(zone_id)?;
            zone.pool = (zone.pool + ZONE_HEALING_YIELD).min(ZONE_POOL_CAP);
        }
        _ => return Err(Rejection::PassiveAbility.into()),
    }

    tracing::debug!(%player, zone = %zone_id, ?cell, ?ability, "Ability used");
    Ok(next)
}

/// First empty orthogonal neighbour of `cell`, checked north, east, south,
/// west.
#[must_use]
pub fn free_neighbour(grid: &ZoneGrid, (row, col): Cell) -> Option<Cell> {
    Direction::ALL.into_iter().find_map(|dir| {
        let (dx, dy) = dir.delta();
        let r = row.checked_add_signed(dy)?;
        let c = col.checked_add_signed(dx)?;
        grid.is_empty(r, c).then_some((r, c))
    })
}
