//! Scenario loading and configuration.
//!
//! Scenarios define the initial game state: the zone layout, starting units
//! for both sides and the rules. Zones on orthogonally adjacent map
//! positions are connected automatically.
//!
//! # Example RON
//!
//! ```ron
//! Scenario(
//!     name: "Duel",
//!     zones: [
//!         (zone_type: Lymphatic, x: 0, y: 0, owner: Player1, border: true),
//!         (zone_type: Tissue, x: 1, y: 0),
//!     ],
//!     units: [
//!         (zone: 0, row: 8, col: 8, unit_type: TCell, owner: One),
//!     ],
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::error::{GameError, Result};
use crate::factions::{Owner, PlayerId};
use crate::map::connect_by_position;
use crate::math::MapPos;
use crate::state::GameState;
use crate::unit_kind::UnitType;
use crate::zone::{UnitInstance, Zone, ZoneGrid, ZoneId, ZoneType};

/// A zone placed at scenario start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSeed {
    /// Region type.
    pub zone_type: ZoneType,
    /// Map column.
    pub x: i32,
    /// Map row.
    pub y: i32,
    /// Initial owner.
    #[serde(default)]
    pub owner: Owner,
    /// Whether new zones may be created from here.
    #[serde(default)]
    pub border: bool,
}

impl ZoneSeed {
    /// Create a neutral, inner zone seed.
    #[must_use]
    pub const fn new(zone_type: ZoneType, x: i32, y: i32) -> Self {
        Self {
            zone_type,
            x,
            y,
            owner: Owner::Neutral,
            border: false,
        }
    }
}

/// A unit placed at scenario start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSeed {
    /// Index into [`Scenario::zones`].
    pub zone: usize,
    /// Grid row.
    pub row: u32,
    /// Grid column.
    pub col: u32,
    /// Unit to spawn.
    pub unit_type: UnitType,
    /// Controlling player.
    pub owner: PlayerId,
}

impl UnitSeed {
    /// Create a unit seed.
    #[must_use]
    pub const fn new(zone: usize, row: u32, col: u32, unit_type: UnitType, owner: PlayerId) -> Self {
        Self {
            zone,
            row,
            col,
            unit_type,
            owner,
        }
    }
}

/// A complete scenario configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Zones in id order.
    pub zones: Vec<ZoneSeed>,
    /// Starting units.
    #[serde(default)]
    pub units: Vec<UnitSeed>,
    /// Rules in force.
    #[serde(default)]
    pub rules: RulesConfig,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::standard()
    }
}

impl Scenario {
    /// Load a scenario from a RON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string (useful for embedded scenarios).
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ConfigParse`] on malformed input.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        Ok(ron::from_str(ron)?)
    }

    /// Serialize to pretty RON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| GameError::Serialization(format!("Failed to encode scenario: {e}")))
    }

    /// The standard 4×4 body map.
    ///
    /// Player one holds a lymph node in the north-west corner and player two
    /// an organ in the south-east corner, each with three starting units.
    /// The outer ring of zones are border zones.
    #[must_use]
    pub fn standard() -> Self {
        const LAYOUT: [[ZoneType; 4]; 4] = [
            [ZoneType::Lymphatic, ZoneType::Tissue, ZoneType::Circulatory, ZoneType::Barrier],
            [ZoneType::Tissue, ZoneType::Organ, ZoneType::Tissue, ZoneType::Circulatory],
            [ZoneType::Circulatory, ZoneType::Tissue, ZoneType::Lymphatic, ZoneType::Tissue],
            [ZoneType::Barrier, ZoneType::Circulatory, ZoneType::Tissue, ZoneType::Organ],
        ];

        let mut zones = Vec::with_capacity(16);
        for (y, row) in (0i32..).zip(LAYOUT) {
            for (x, zone_type) in (0i32..).zip(row) {
                let mut seed = ZoneSeed::new(zone_type, x, y);
                seed.border = x == 0 || y == 0 || x == 3 || y == 3;
                zones.push(seed);
            }
        }
        zones[0].owner = Owner::Player1;
        zones[15].owner = Owner::Player2;

        Self {
            name: "Standard Body".to_string(),
            description: "4x4 body map with opposing corner strongholds".to_string(),
            zones,
            units: vec![
                UnitSeed::new(0, 7, 7, UnitType::TCell, PlayerId::One),
                UnitSeed::new(0, 7, 8, UnitType::TCell, PlayerId::One),
                UnitSeed::new(0, 8, 7, UnitType::Macrophage, PlayerId::One),
                UnitSeed::new(15, 7, 7, UnitType::Virus, PlayerId::Two),
                UnitSeed::new(15, 7, 8, UnitType::Virus, PlayerId::Two),
                UnitSeed::new(15, 8, 7, UnitType::Bacteria, PlayerId::Two),
            ],
            rules: RulesConfig::default(),
        }
    }

    /// Build the initial game state.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] if zones overlap, a unit seed
    /// points at a missing zone or an unusable cell, or a unit is seeded for
    /// the wrong faction.
    pub fn build(&self) -> Result<GameState> {
        let mut zones: Vec<Zone> = (0u32..)
            .zip(&self.zones)
            .map(|(id, seed)| {
                Zone::new(ZoneId(id), seed.zone_type, MapPos::new(seed.x, seed.y))
                    .with_owner(seed.owner)
                    .with_border(seed.border)
            })
            .collect();
        connect_by_position(&mut zones)?;

        for seed in &self.units {
            let zone = zones.get_mut(seed.zone).ok_or_else(|| {
                GameError::InvalidState(format!("unit seeded in missing zone {}", seed.zone))
            })?;
            if seed.unit_type.faction() != seed.owner.faction() {
                return Err(GameError::InvalidState(format!(
                    "{:?} cannot belong to player {}",
                    seed.unit_type, seed.owner
                )));
            }
            if !ZoneGrid::in_bounds(seed.row, seed.col) || !zone.grid.is_empty(seed.row, seed.col)
            {
                return Err(GameError::InvalidState(format!(
                    "cannot seed unit at ({}, {}) in zone {}",
                    seed.row, seed.col, zone.id
                )));
            }
            zone.grid.set(
                seed.row,
                seed.col,
                Some(UnitInstance::spawn(seed.unit_type, seed.owner)),
            );
        }

        let state = GameState::new(zones, self.rules.clone())?;
        tracing::debug!(
            scenario = %self.name,
            zones = state.zones.len(),
            units = self.units.len(),
            "Scenario built"
        );
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::are_adjacent;
    use crate::victory::check_victory_conditions;

    #[test]
    fn test_standard_scenario_builds() {
        let state = Scenario::standard().build().unwrap();
        assert_eq!(state.zones.len(), 16);
        assert_eq!(state.total_units(PlayerId::One), 3);
        assert_eq!(state.total_units(PlayerId::Two), 3);
        assert!(are_adjacent(&state.zones, ZoneId(0), ZoneId(1)));
        assert!(are_adjacent(&state.zones, ZoneId(0), ZoneId(4)));
        assert!(!are_adjacent(&state.zones, ZoneId(0), ZoneId(5)));
        assert!(state.zones[0].is_border);
        assert!(!state.zones[5].is_border);
        assert_eq!(check_victory_conditions(&state), None);
    }

    #[test]
    fn test_ron_round_trip() {
        let scenario = Scenario::standard();
        let ron = scenario.to_ron_string().unwrap();
        assert_eq!(Scenario::from_ron_str(&ron).unwrap(), scenario);
    }

    #[test]
    fn test_minimal_ron_uses_defaults() {
        let scenario = Scenario::from_ron_str(
            r#"Scenario(
                name: "Duel",
                zones: [
                    (zone_type: Lymphatic, x: 0, y: 0, owner: Player1, border: true),
                    (zone_type: Tissue, x: 1, y: 0),
                ],
                units: [
                    (zone: 0, row: 8, col: 8, unit_type: TCell, owner: One),
                ],
            )"#,
        )
        .unwrap();
        assert_eq!(scenario.rules, RulesConfig::default());

        let state = scenario.build().unwrap();
        assert_eq!(state.zones[1].owner, Owner::Neutral);
        assert!(are_adjacent(&state.zones, ZoneId(0), ZoneId(1)));
    }

    #[test]
    fn test_build_rejects_bad_seeds() {
        let mut scenario = Scenario::standard();
        scenario.units.push(UnitSeed::new(0, 7, 7, UnitType::BCell, PlayerId::One));
        assert!(matches!(scenario.build(), Err(GameError::InvalidState(_))));

        let mut scenario = Scenario::standard();
        scenario.units.push(UnitSeed::new(40, 0, 0, UnitType::BCell, PlayerId::One));
        assert!(scenario.build().is_err());

        let mut scenario = Scenario::standard();
        scenario.units.push(UnitSeed::new(1, 0, 0, UnitType::Virus, PlayerId::One));
        assert!(scenario.build().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("standard.ron");
        std::fs::write(&path, Scenario::standard().to_ron_string().unwrap()).unwrap();
        assert_eq!(Scenario::load(&path).unwrap(), Scenario::standard());
    }
}
