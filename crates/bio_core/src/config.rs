//! Tunable rule parameters.
//!
//! `RulesConfig` travels inside every [`GameState`](crate::state::GameState)
//! so that a snapshot or replay always carries the exact numbers it was
//! played with. Values load from RON; omitted fields fall back to defaults.
//!
//! # Example RON
//!
//! ```ron
//! RulesConfig(
//!     max_zones: 32,
//!     infection_defense_percent: 25,
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::factions::{Faction, PlayerId};
use crate::resources::Resources;

/// Rule parameters for a game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Opening pool for the immune system player.
    pub immune_starting_resources: Resources,
    /// Opening pool for the pathogen player.
    pub pathogen_starting_resources: Resources,
    /// Hard cap on the number of zones.
    pub max_zones: usize,
    /// Turns of generation stocked in a newly created zone.
    pub new_zone_stockpile_turns: u32,
    /// Percentage of defense a zone keeps after each infection.
    pub infection_defense_percent: u32,
    /// Antibody generation percentage applied by each immune response.
    pub immune_antibody_percent: u32,
    /// Ceiling for a zone's antibody multiplier, as a percentage.
    pub max_antibody_percent: u32,
    /// Zone creation cost percentage for the immune system.
    pub immune_creation_cost_percent: u32,
    /// Zone creation cost percentage for the pathogen.
    pub pathogen_creation_cost_percent: u32,
    /// Full rounds that must finish before elimination can end the game.
    pub opening_rounds: u32,
    /// Starting infection level (0..=100).
    pub initial_infection_level: u8,
    /// Starting immune response level (0..=100).
    pub initial_immune_response_level: u8,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            immune_starting_resources: Resources::new(1200, 800, 150, 900),
            pathogen_starting_resources: Resources::new(1500, 200, 50, 1200),
            max_zones: 64,
            new_zone_stockpile_turns: 5,
            infection_defense_percent: 50,
            immune_antibody_percent: 150,
            max_antibody_percent: 500,
            immune_creation_cost_percent: 100,
            pathogen_creation_cost_percent: 120,
            opening_rounds: 1,
            initial_infection_level: 20,
            initial_immune_response_level: 30,
        }
    }
}

impl RulesConfig {
    /// Parse rules from a RON string.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ConfigParse`](crate::error::GameError::ConfigParse)
    /// on malformed input.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        Ok(ron::from_str(ron)?)
    }

    /// Load rules from a RON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_ron_str(&contents)
    }

    /// Opening pool for a player.
    #[must_use]
    pub const fn starting_resources(&self, player: PlayerId) -> Resources {
        match player.faction() {
            Faction::ImmuneSystem => self.immune_starting_resources,
            Faction::Pathogen => self.pathogen_starting_resources,
        }
    }

    /// Zone creation cost percentage for a faction.
    #[must_use]
    pub const fn creation_cost_percent(&self, faction: Faction) -> u32 {
        match faction {
            Faction::ImmuneSystem => self.immune_creation_cost_percent,
            Faction::Pathogen => self.pathogen_creation_cost_percent,
        }
    }
}
