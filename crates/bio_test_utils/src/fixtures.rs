//! Test fixtures and helpers.
//!
//! Pre-built game states and unit layouts for consistent testing.

use bio_core::config::RulesConfig;
use bio_core::factions::{Owner, PlayerId};
use bio_core::map::connect_by_position;
use bio_core::math::MapPos;
use bio_core::resources::Resources;
use bio_core::scenario::Scenario;
use bio_core::state::GameState;
use bio_core::unit_kind::UnitType;
use bio_core::zone::{UnitInstance, Zone, ZoneId, ZoneType, GRID_SIZE};
use fixed::types::I32F32;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In engine code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// The standard 4×4 scenario, built.
///
/// # Panics
///
/// Panics if the built-in scenario fails to build.
#[must_use]
pub fn standard_state() -> GameState {
    Scenario::standard()
        .build()
        .expect("standard scenario must build")
}

/// A horizontal row of connected, neutral zones of the given types.
///
/// # Panics
///
/// Panics if the zones cannot be connected.
#[must_use]
pub fn row_of_zones(types: &[ZoneType]) -> GameState {
    let mut zones: Vec<Zone> = (0u32..)
        .zip(types)
        .map(|(id, &zone_type)| {
            let x = i32::try_from(id).expect("zone count fits i32");
            Zone::new(ZoneId(id), zone_type, MapPos::new(x, 0))
        })
        .collect();
    connect_by_position(&mut zones).expect("row zones connect");
    GameState::new(zones, RulesConfig::default()).expect("row state is valid")
}

/// `count` unconnected tissue zones.
#[must_use]
pub fn isolated_zones(count: u32) -> GameState {
    let zones = (0..count)
        .map(|id| {
            let x = i32::try_from(id * 2).expect("zone count fits i32");
            Zone::new(ZoneId(id), ZoneType::Tissue, MapPos::new(x, 0))
        })
        .collect();
    GameState::new(zones, RulesConfig::default()).expect("isolated zones are valid")
}

/// Default unit type for a player's faction.
#[must_use]
pub const fn default_unit(player: PlayerId) -> UnitType {
    match player {
        PlayerId::One => UnitType::TCell,
        PlayerId::Two => UnitType::Virus,
    }
}

/// Add `count` units for `player` to the first free cells of a zone.
///
/// # Panics
///
/// Panics if the zone index is out of range or the zone is full.
pub fn fill_zone(state: &mut GameState, zone: usize, player: PlayerId, count: u32) {
    let grid = &mut state.zones[zone].grid;
    let mut placed = 0;
    for index in 0..GRID_SIZE * GRID_SIZE {
        if placed == count {
            break;
        }
        let (row, col) = (index / GRID_SIZE, index % GRID_SIZE);
        if grid.is_empty(row, col) {
            grid.set(row, col, Some(UnitInstance::spawn(default_unit(player), player)));
            placed += 1;
        }
    }
    assert_eq!(placed, count, "zone {zone} has no room for {count} units");
    state.refresh_control();
}

/// Give both players the same pool.
pub fn set_resources(state: &mut GameState, resources: Resources) {
    state.resources = [resources; 2];
}

/// Hand one zone to a player by ownership.
pub fn set_owner(state: &mut GameState, zone: usize, owner: Owner) {
    state.zones[zone].owner = owner;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_creation() {
        assert_eq!(fixed(10), bio_core::math::Fixed::from_num(10));
        assert_eq!(fixed_f(0.5), bio_core::math::percent(50));
    }

    #[test]
    fn test_fill_zone_skips_occupied() {
        let mut state = isolated_zones(1);
        fill_zone(&mut state, 0, PlayerId::One, 2);
        fill_zone(&mut state, 0, PlayerId::Two, 3);
        assert_eq!(state.zones[0].unit_counts(), (2, 3));
        assert!(state.zones[0].controlled);
    }

    #[test]
    fn test_row_is_connected() {
        let state = row_of_zones(&[ZoneType::Tissue, ZoneType::Organ, ZoneType::Barrier]);
        assert!(bio_core::map::are_adjacent(&state.zones, ZoneId(1), ZoneId(2)));
        assert!(!bio_core::map::are_adjacent(&state.zones, ZoneId(0), ZoneId(2)));
    }
}
