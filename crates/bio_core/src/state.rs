//! The game state aggregate root.
//!
//! A [`GameState`] is a plain value. Engine operations take a state by
//! reference and return a new one, so any prior snapshot stays valid for
//! undo, replay, or concurrent reads.
//!
//! # Determinism
//!
//! - No floating point: multipliers are fixed-point.
//! - No hash-map iteration: zones live in an ordered `Vec`.
//! - [`GameState::state_hash`] is stable for equal states.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::error::{GameError, Result};
use crate::factions::PlayerId;
use crate::map;
use crate::resources::Resources;
use crate::victory::VictoryResult;
use crate::zone::{Zone, ZoneId};

/// Game phase.
///
/// Only `Deploy` and `Victory` are enforced; the intermediate phases are
/// carried for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before a state exists. Never observed on a live state.
    Setup,
    /// Players deploy and act.
    #[default]
    Deploy,
    /// Fighting.
    Combat,
    /// Expanding territory.
    Expansion,
    /// Terminal: a winner has been decided.
    Victory,
}

/// Complete game state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    /// All zones in creation order.
    pub zones: Vec<Zone>,
    /// Player whose turn it is.
    pub current_player: PlayerId,
    /// Full-round counter, starting at 1.
    pub turn: u32,
    /// Per-player pools indexed by [`PlayerId::index`].
    pub resources: [Resources; 2],
    /// Current phase.
    pub phase: GamePhase,
    /// Zone highlighted by the presentation layer.
    pub selected_zone: Option<ZoneId>,
    /// Result once the game has ended.
    pub winner: Option<VictoryResult>,
    /// Global infection pressure (0..=100).
    pub infection_level: u8,
    /// Global immune readiness (0..=100).
    pub immune_response_level: u8,
    /// Rules this game is played with.
    pub rules: RulesConfig,
}

impl GameState {
    /// Create a game over the given zones.
    ///
    /// Player one moves first on turn 1; pools start from the rules.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] if zone ids repeat or a
    /// connection is not mirrored.
    pub fn new(zones: Vec<Zone>, rules: RulesConfig) -> Result<Self> {
        let mut state = Self {
            zones,
            current_player: PlayerId::One,
            turn: 1,
            resources: [
                rules.starting_resources(PlayerId::One),
                rules.starting_resources(PlayerId::Two),
            ],
            phase: GamePhase::Deploy,
            selected_zone: None,
            winner: None,
            infection_level: rules.initial_infection_level,
            immune_response_level: rules.initial_immune_response_level,
            rules,
        };
        state.validate()?;
        state.refresh_control();
        Ok(state)
    }

    /// Check structural invariants.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] on duplicate ids, one-way links,
    /// or a selected zone that does not exist.
    pub fn validate(&self) -> Result<()> {
        map::validate_connections(&self.zones)?;
        if let Some(selected) = self.selected_zone {
            map::find_zone(&self.zones, selected).map_err(|_| {
                GameError::InvalidState(format!("selected zone {selected} does not exist"))
            })?;
        }
        Ok(())
    }

    /// Whether a winner has been decided.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Borrow a zone.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ZoneNotFound`] for unknown ids.
    pub fn zone(&self, id: ZoneId) -> Result<&Zone> {
        map::find_zone(&self.zones, id)
    }

    /// Mutably borrow a zone.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ZoneNotFound`] for unknown ids.
    pub fn zone_mut(&mut self, id: ZoneId) -> Result<&mut Zone> {
        self.zones
            .iter_mut()
            .find(|zone| zone.id == id)
            .ok_or(GameError::ZoneNotFound(id))
    }

    /// Pool of a player.
    #[must_use]
    pub const fn resources_of(&self, player: PlayerId) -> &Resources {
        &self.resources[player.index()]
    }

    /// Mutable pool of a player.
    pub fn resources_of_mut(&mut self, player: PlayerId) -> &mut Resources {
        &mut self.resources[player.index()]
    }

    /// Pool of the player to move.
    #[must_use]
    pub const fn current_resources(&self) -> &Resources {
        self.resources_of(self.current_player)
    }

    /// Units owned by `player` across every zone.
    #[must_use]
    pub fn total_units(&self, player: PlayerId) -> u32 {
        self.zones.iter().map(|z| z.grid.count_owned(player)).sum()
    }

    /// Id for the next created zone.
    #[must_use]
    pub fn next_zone_id(&self) -> ZoneId {
        let next = self.zones.iter().map(|z| z.id.0 + 1).max().unwrap_or(0);
        ZoneId(next)
    }

    /// Recompute every zone's `controlled` flag.
    pub fn refresh_control(&mut self) {
        for zone in &mut self.zones {
            zone.refresh_control();
        }
    }

    /// Return a copy with `zone` selected.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ZoneNotFound`] for unknown ids.
    pub fn with_selected_zone(&self, zone: ZoneId) -> Result<Self> {
        self.zone(zone)?;
        let mut next = self.clone();
        next.selected_zone = Some(zone);
        Ok(next)
    }

    /// Compute a hash of the full game state.
    ///
    /// Equal states hash equally on every client built from the same code.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Serialize to compact bytes for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| GameError::Serialization(format!("Failed to serialize game state: {e}")))
    }

    /// Deserialize from bytes produced by [`serialize`](Self::serialize).
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails or the decoded state is invalid.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        let state: Self = bincode::deserialize(data).map_err(|e| {
            GameError::Serialization(format!("Failed to deserialize game state: {e}"))
        })?;
        state.validate()?;
        Ok(state)
    }

    /// Encode as JSON for the presentation layer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| GameError::Serialization(format!("Failed to encode snapshot: {e}")))
    }

    /// Decode a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails or the decoded state is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let state: Self = serde_json::from_str(json)
            .map_err(|e| GameError::Serialization(format!("Failed to decode snapshot: {e}")))?;
        state.validate()?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factions::Owner;
    use crate::map::connect_by_position;
    use crate::math::MapPos;
    use crate::unit_kind::UnitType;
    use crate::zone::{Direction, UnitInstance, ZoneType};

    fn two_zone_state() -> GameState {
        let mut zones = vec![
            Zone::new(ZoneId(0), ZoneType::Lymphatic, MapPos::new(0, 0)).with_owner(Owner::Player1),
            Zone::new(ZoneId(1), ZoneType::Tissue, MapPos::new(1, 0)).with_owner(Owner::Player2),
        ];
        connect_by_position(&mut zones).unwrap();
        GameState::new(zones, RulesConfig::default()).unwrap()
    }

    #[test]
    fn test_new_state_defaults() {
        let state = two_zone_state();
        assert_eq!(state.turn, 1);
        assert_eq!(state.current_player, PlayerId::One);
        assert_eq!(state.phase, GamePhase::Deploy);
        assert!(!state.is_over());
        assert_eq!(state.infection_level, 20);
        assert_eq!(state.immune_response_level, 30);
        assert_eq!(
            *state.resources_of(PlayerId::Two),
            Resources::new(1500, 200, 50, 1200)
        );
    }

    #[test]
    fn test_new_rejects_one_way_link() {
        let mut zones = vec![
            Zone::new(ZoneId(0), ZoneType::Tissue, MapPos::new(0, 0)),
            Zone::new(ZoneId(1), ZoneType::Tissue, MapPos::new(1, 0)),
        ];
        zones[0].connections[Direction::East.slot()] = Some(ZoneId(1));
        assert!(GameState::new(zones, RulesConfig::default()).is_err());
    }

    #[test]
    fn test_zone_lookup() {
        let state = two_zone_state();
        assert_eq!(state.zone(ZoneId(1)).unwrap().zone_type, ZoneType::Tissue);
        assert!(matches!(
            state.zone(ZoneId(7)),
            Err(GameError::ZoneNotFound(ZoneId(7)))
        ));
        assert_eq!(state.next_zone_id(), ZoneId(2));
    }

    #[test]
    fn test_select_zone_returns_new_value() {
        let state = two_zone_state();
        let selected = state.with_selected_zone(ZoneId(1)).unwrap();
        assert_eq!(selected.selected_zone, Some(ZoneId(1)));
        assert_eq!(state.selected_zone, None);
        assert!(state.with_selected_zone(ZoneId(5)).is_err());
    }

    #[test]
    fn test_state_hash_tracks_changes() {
        let state = two_zone_state();
        let same = two_zone_state();
        assert_eq!(state.state_hash(), same.state_hash());

        let mut changed = state.clone();
        changed.zones[0]
            .grid
            .set(1, 1, Some(UnitInstance::spawn(UnitType::TCell, PlayerId::One)));
        assert_ne!(state.state_hash(), changed.state_hash());
    }

    #[test]
    fn test_bincode_round_trip_preserves_state() {
        let state = two_zone_state();
        let bytes = state.serialize().unwrap();
        let restored = GameState::deserialize(&bytes).unwrap();
        assert_eq!(state, restored);
        assert_eq!(state.state_hash(), restored.state_hash());
    }

    #[test]
    fn test_json_snapshot_round_trip() {
        let state = two_zone_state();
        let json = state.to_json().unwrap();
        assert!(json.contains("\"current_player\":\"One\""));
        assert_eq!(GameState::from_json(&json).unwrap(), state);
    }

    #[test]
    fn test_snapshot_with_short_grid_is_rejected() {
        let state = two_zone_state();
        let mut json: serde_json::Value = serde_json::from_str(&state.to_json().unwrap()).unwrap();
        json["zones"][0]["grid"]["cells"] = serde_json::json!([]);

        let err = GameState::from_json(&json.to_string()).unwrap_err();
        assert!(matches!(err, GameError::Serialization(_)));
        assert!(err.to_string().contains("expected 256"));
    }

    #[test]
    fn test_deserialize_garbage_fails() {
        assert!(matches!(
            GameState::deserialize(&[1, 2, 3]),
            Err(GameError::Serialization(_))
        ));
    }
}
