//! Zones: the 16×16 cell grids that make up the body map.
//!
//! A zone carries its grid of unit slots, a zone-level resource pool,
//! ownership, modifiers applied by expansion actions, and four connection
//! slots to neighbouring zones.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::factions::{Owner, PlayerId};
use crate::math::{fixed_serde, Fixed, MapPos};
use crate::resources::Resources;
use crate::unit_kind::{stats_of, UnitType};

/// Side length of every zone grid.
pub const GRID_SIZE: u32 = 16;

/// Upper bound for each zone pool component.
pub const ZONE_POOL_CAP: Resources = Resources::new(1000, 1000, 100, 1000);

/// Stable zone identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId(pub u32);

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Zone types
// ============================================================================

/// Biological region type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneType {
    /// Blood vessels: no terrain defense.
    Circulatory,
    /// Soft tissue.
    Tissue,
    /// Lymph nodes: antibody factories.
    Lymphatic,
    /// Skin and membranes: hardest to break.
    Barrier,
    /// Vital organs: rich but exposed.
    Organ,
}

impl ZoneType {
    /// All zone types in index order.
    pub const ALL: [Self; 5] = [
        Self::Circulatory,
        Self::Tissue,
        Self::Lymphatic,
        Self::Barrier,
        Self::Organ,
    ];

    /// Resolve a wire index.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownZoneType`] for indices outside the table.
    pub fn from_index(index: u8) -> Result<Self> {
        Self::ALL
            .get(usize::from(index))
            .copied()
            .ok_or(GameError::UnknownZoneType(index))
    }

    /// Resources produced per turn by a controlled zone of this type.
    #[must_use]
    pub const fn resource_generation(self) -> Resources {
        match self {
            Self::Circulatory => Resources::new(10, 5, 2, 8),
            Self::Tissue => Resources::new(5, 15, 1, 10),
            Self::Lymphatic => Resources::new(8, 20, 5, 5),
            Self::Barrier => Resources::new(3, 25, 1, 3),
            Self::Organ => Resources::new(15, 10, 3, 15),
        }
    }

    /// Base cost to create a zone of this type, before faction scaling.
    #[must_use]
    pub const fn creation_cost(self) -> Resources {
        match self {
            Self::Circulatory => Resources::new(200, 100, 20, 150),
            Self::Tissue => Resources::new(150, 75, 15, 100),
            Self::Lymphatic => Resources::new(300, 150, 30, 200),
            Self::Barrier => Resources::new(400, 200, 40, 300),
            Self::Organ => Resources::new(500, 250, 50, 400),
        }
    }

    /// Damage absorbed by the terrain on every attack.
    #[must_use]
    pub const fn defense_bonus(self) -> u16 {
        match self {
            Self::Circulatory => 0,
            Self::Tissue => 2,
            Self::Lymphatic => 3,
            Self::Barrier => 5,
            Self::Organ => 1,
        }
    }
}

// ============================================================================
// Cells
// ============================================================================

/// A unit standing in a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitInstance {
    /// Catalog type.
    pub unit_type: UnitType,
    /// Remaining health.
    pub health: u16,
    /// Controlling player.
    pub owner: PlayerId,
}

impl UnitInstance {
    /// A fresh unit at full health.
    #[must_use]
    pub fn spawn(unit_type: UnitType, owner: PlayerId) -> Self {
        Self {
            unit_type,
            health: stats_of(unit_type).stats.health,
            owner,
        }
    }

    /// Maximum health from the catalog.
    #[must_use]
    pub fn max_health(&self) -> u16 {
        stats_of(self.unit_type).stats.health
    }
}

/// Fixed-size square grid of optional units, row-major.
///
/// Decoding checks the cell count, so every grid holds exactly
/// `GRID_SIZE * GRID_SIZE` slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct ZoneGrid {
    cells: Vec<Option<UnitInstance>>,
}

/// Wire form of [`ZoneGrid`] before the size check.
#[derive(Deserialize)]
struct RawGrid {
    cells: Vec<Option<UnitInstance>>,
}

impl TryFrom<RawGrid> for ZoneGrid {
    type Error = String;

    fn try_from(raw: RawGrid) -> std::result::Result<Self, Self::Error> {
        let expected = (GRID_SIZE * GRID_SIZE) as usize;
        if raw.cells.len() == expected {
            Ok(Self { cells: raw.cells })
        } else {
            Err(format!(
                "zone grid has {} cells, expected {expected}",
                raw.cells.len()
            ))
        }
    }
}

impl Default for ZoneGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoneGrid {
    /// Create an empty grid.
    #[must_use]
    pub fn new() -> Self {
        let count = (GRID_SIZE * GRID_SIZE) as usize;
        Self {
            cells: vec![None; count],
        }
    }

    #[inline]
    fn index(row: u32, col: u32) -> usize {
        (row as usize) * (GRID_SIZE as usize) + (col as usize)
    }

    /// Check if coordinates are within the grid.
    #[must_use]
    pub const fn in_bounds(row: u32, col: u32) -> bool {
        row < GRID_SIZE && col < GRID_SIZE
    }

    /// Get the occupant at coordinates.
    ///
    /// Returns `None` for empty or out-of-bounds cells.
    #[must_use]
    pub fn get(&self, row: u32, col: u32) -> Option<&UnitInstance> {
        if Self::in_bounds(row, col) {
            self.cells[Self::index(row, col)].as_ref()
        } else {
            None
        }
    }

    /// Mutable access to the occupant at coordinates.
    pub fn get_mut(&mut self, row: u32, col: u32) -> Option<&mut UnitInstance> {
        if Self::in_bounds(row, col) {
            self.cells[Self::index(row, col)].as_mut()
        } else {
            None
        }
    }

    /// Check if a cell is in bounds and empty.
    #[must_use]
    pub fn is_empty(&self, row: u32, col: u32) -> bool {
        Self::in_bounds(row, col) && self.cells[Self::index(row, col)].is_none()
    }

    /// Write a cell.
    /// Returns `false` if out of bounds.
    pub fn set(&mut self, row: u32, col: u32, cell: Option<UnitInstance>) -> bool {
        if Self::in_bounds(row, col) {
            self.cells[Self::index(row, col)] = cell;
            true
        } else {
            false
        }
    }

    /// Remove and return the occupant of a cell.
    pub fn take(&mut self, row: u32, col: u32) -> Option<UnitInstance> {
        if Self::in_bounds(row, col) {
            self.cells[Self::index(row, col)].take()
        } else {
            None
        }
    }

    /// Iterate over occupied cells as `(row, col, unit)`.
    pub fn units(&self) -> impl Iterator<Item = (u32, u32, &UnitInstance)> {
        self.cells.iter().enumerate().filter_map(|(i, cell)| {
            let i = i as u32;
            cell.as_ref().map(|unit| (i / GRID_SIZE, i % GRID_SIZE, unit))
        })
    }

    /// Number of units owned by `player`.
    #[must_use]
    pub fn count_owned(&self, player: PlayerId) -> u32 {
        self.units().filter(|(_, _, u)| u.owner == player).count() as u32
    }
}

// ============================================================================
// Connections
// ============================================================================

/// Connection slot direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward negative y.
    North,
    /// Toward positive x.
    East,
    /// Toward positive y.
    South,
    /// Toward negative x.
    West,
}

impl Direction {
    /// All directions in slot order.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Slot index in [`Zone::connections`].
    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// The reverse direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Unit step `(dx, dy)` on the zone map.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Direction from `from` to an orthogonally adjacent `to`.
    #[must_use]
    pub fn between(from: MapPos, to: MapPos) -> Option<Self> {
        Self::ALL.into_iter().find(|dir| {
            let (dx, dy) = dir.delta();
            from.offset(dx, dy) == to
        })
    }
}

// ============================================================================
// Zone
// ============================================================================

/// One zone of the body map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Zone {
    /// Stable identifier.
    pub id: ZoneId,
    /// Region type.
    pub zone_type: ZoneType,
    /// Position on the zone map.
    pub position: MapPos,
    /// Zone ownership, changed by expansion actions.
    pub owner: Owner,
    /// Zone-level resource stockpile.
    pub pool: Resources,
    /// Eligible as the origin of new zone creation.
    pub is_border: bool,
    /// Some player holds a strict cell majority. Maintained by the engine.
    pub controlled: bool,
    /// Neighbours by [`Direction::slot`].
    pub connections: [Option<ZoneId>; 4],
    /// Multiplier on the terrain defense bonus, lowered by infection.
    #[serde(with = "fixed_serde")]
    pub defense_multiplier: Fixed,
    /// Multiplier on antibody generation, raised by immune staging.
    #[serde(with = "fixed_serde")]
    pub antibody_multiplier: Fixed,
    /// Unit slots.
    pub grid: ZoneGrid,
}

/// Starting stockpile of a seeded zone.
pub const DEFAULT_ZONE_POOL: Resources = Resources::new(100, 50, 10, 75);

impl Zone {
    /// Create an empty, neutral, unconnected zone.
    #[must_use]
    pub fn new(id: ZoneId, zone_type: ZoneType, position: MapPos) -> Self {
        Self {
            id,
            zone_type,
            position,
            owner: Owner::Neutral,
            pool: DEFAULT_ZONE_POOL,
            is_border: false,
            controlled: false,
            connections: [None; 4],
            defense_multiplier: Fixed::ONE,
            antibody_multiplier: Fixed::ONE,
            grid: ZoneGrid::new(),
        }
    }

    /// Builder-style owner override.
    #[must_use]
    pub fn with_owner(mut self, owner: Owner) -> Self {
        self.owner = owner;
        self
    }

    /// Builder-style border flag.
    #[must_use]
    pub fn with_border(mut self, is_border: bool) -> Self {
        self.is_border = is_border;
        self
    }

    /// Count units per player, `(player one, player two)`.
    #[must_use]
    pub fn unit_counts(&self) -> (u32, u32) {
        self.grid
            .units()
            .fold((0, 0), |(one, two), (_, _, unit)| match unit.owner {
                PlayerId::One => (one + 1, two),
                PlayerId::Two => (one, two + 1),
            })
    }

    /// Player holding a strict majority of occupied cells.
    ///
    /// Returns `None` when tied or empty.
    #[must_use]
    pub fn dominant_player(&self) -> Option<PlayerId> {
        let (one, two) = self.unit_counts();
        match one.cmp(&two) {
            std::cmp::Ordering::Greater => Some(PlayerId::One),
            std::cmp::Ordering::Less => Some(PlayerId::Two),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Cell-majority control as an [`Owner`].
    #[must_use]
    pub fn dominant_owner(&self) -> Owner {
        self.dominant_player().map_or(Owner::Neutral, Owner::from)
    }

    /// Recompute the `controlled` flag from the grid.
    pub fn refresh_control(&mut self) {
        self.controlled = self.dominant_player().is_some();
    }

    /// Whether `player` holds this zone by ownership or cell majority.
    #[must_use]
    pub fn is_held_by(&self, player: PlayerId) -> bool {
        self.owner.is(player) || self.dominant_player() == Some(player)
    }

    /// Connected zone in a direction.
    #[must_use]
    pub const fn neighbour(&self, dir: Direction) -> Option<ZoneId> {
        self.connections[dir.slot()]
    }

    /// Whether this zone lists `other` among its connections.
    #[must_use]
    pub fn connects_to(&self, other: ZoneId) -> bool {
        self.connections.contains(&Some(other))
    }

    /// Terrain defense after modifiers, floored.
    #[must_use]
    pub fn effective_defense(&self) -> u16 {
        let scaled = crate::math::scale_floor(
            u32::from(self.zone_type.defense_bonus()),
            self.defense_multiplier,
        );
        u16::try_from(scaled).unwrap_or(u16::MAX)
    }

    /// Per-turn generation after modifiers.
    #[must_use]
    pub fn effective_generation(&self) -> Resources {
        let mut generation = self.zone_type.resource_generation();
        generation.antibodies =
            crate::math::scale_floor(generation.antibodies, self.antibody_multiplier);
        generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::percent;

    fn zone() -> Zone {
        Zone::new(ZoneId(0), ZoneType::Tissue, MapPos::new(0, 0))
    }

    #[test]
    fn test_grid_default_empty() {
        let grid = ZoneGrid::new();
        assert_eq!(grid.units().count(), 0);
        assert!(grid.is_empty(0, 0));
        assert!(grid.is_empty(15, 15));
    }

    #[test]
    fn test_grid_bounds() {
        let mut grid = ZoneGrid::new();
        assert!(!ZoneGrid::in_bounds(16, 0));
        assert!(!ZoneGrid::in_bounds(0, 16));
        assert!(!grid.is_empty(16, 3));
        assert!(!grid.set(16, 0, Some(UnitInstance::spawn(UnitType::TCell, PlayerId::One))));
        assert!(grid.get(99, 99).is_none());
    }

    #[test]
    fn test_grid_set_get_take() {
        let mut grid = ZoneGrid::new();
        let unit = UnitInstance::spawn(UnitType::Virus, PlayerId::Two);
        assert!(grid.set(3, 7, Some(unit)));
        assert_eq!(grid.get(3, 7), Some(&unit));
        assert!(!grid.is_empty(3, 7));

        let units: Vec<_> = grid.units().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(units, vec![(3, 7)]);

        assert_eq!(grid.take(3, 7), Some(unit));
        assert!(grid.is_empty(3, 7));
    }

    #[test]
    fn test_grid_decode_checks_cell_count() {
        let short = bincode::serialize(&vec![None::<UnitInstance>; 3]).unwrap();
        let err = bincode::deserialize::<ZoneGrid>(&short).unwrap_err();
        assert!(err.to_string().contains("expected 256"));

        let full = bincode::serialize(&ZoneGrid::new()).unwrap();
        assert_eq!(bincode::deserialize::<ZoneGrid>(&full).unwrap(), ZoneGrid::new());
    }

    #[test]
    fn test_spawn_full_health() {
        let unit = UnitInstance::spawn(UnitType::TCell, PlayerId::One);
        assert_eq!(unit.health, 80);
        assert_eq!(unit.max_health(), 80);
    }

    #[test]
    fn test_dominant_player_requires_strict_majority() {
        let mut z = zone();
        assert_eq!(z.dominant_player(), None);

        z.grid.set(0, 0, Some(UnitInstance::spawn(UnitType::TCell, PlayerId::One)));
        z.grid.set(0, 1, Some(UnitInstance::spawn(UnitType::Virus, PlayerId::Two)));
        assert_eq!(z.dominant_player(), None);
        assert_eq!(z.dominant_owner(), Owner::Neutral);

        z.grid.set(0, 2, Some(UnitInstance::spawn(UnitType::Virus, PlayerId::Two)));
        assert_eq!(z.dominant_player(), Some(PlayerId::Two));
        z.refresh_control();
        assert!(z.controlled);
    }

    #[test]
    fn test_direction_round_trip() {
        let origin = MapPos::new(2, 2);
        for dir in Direction::ALL {
            let (dx, dy) = dir.delta();
            let next = origin.offset(dx, dy);
            assert_eq!(Direction::between(origin, next), Some(dir));
            assert_eq!(Direction::between(next, origin), Some(dir.opposite()));
        }
        assert_eq!(Direction::between(origin, MapPos::new(3, 3)), None);
    }

    #[test]
    fn test_effective_defense_with_infection() {
        let mut z = Zone::new(ZoneId(1), ZoneType::Barrier, MapPos::new(0, 0));
        assert_eq!(z.effective_defense(), 5);
        z.defense_multiplier *= percent(50);
        assert_eq!(z.effective_defense(), 2);
        z.defense_multiplier *= percent(50);
        assert_eq!(z.effective_defense(), 1);
    }

    #[test]
    fn test_effective_generation_boosts_antibodies_only() {
        let mut z = Zone::new(ZoneId(1), ZoneType::Lymphatic, MapPos::new(0, 0));
        z.antibody_multiplier = percent(150);
        assert_eq!(z.effective_generation(), Resources::new(8, 30, 5, 5));
    }

    #[test]
    fn test_zone_type_index() {
        assert_eq!(ZoneType::from_index(4).unwrap(), ZoneType::Organ);
        assert!(matches!(
            ZoneType::from_index(5),
            Err(GameError::UnknownZoneType(5))
        ));
    }
}
