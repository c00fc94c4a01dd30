//! Victory condition evaluation.
//!
//! Conditions are checked in strict priority order and the first one that
//! holds decides the game:
//!
//! 1. **Zone majority**: one player dominates more than half of all zones.
//! 2. **Elimination**: one player has no units left anywhere. Only checked
//!    once the opening rounds are over, so an empty board at game start never
//!    ends the game.
//! 3. **Resource depletion**: one player has neither energy nor nutrients.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::factions::{Faction, PlayerId};
use crate::state::{GamePhase, GameState};

/// Condition that ended the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VictoryReason {
    /// Winner dominates a strict majority of zones.
    ZoneMajority,
    /// Loser has no units on the board.
    Elimination,
    /// Loser has run out of energy and nutrients.
    ResourceDepletion,
}

/// Decided outcome of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VictoryResult {
    /// Winning player.
    pub winner: PlayerId,
    /// Deciding condition.
    pub reason: VictoryReason,
}

impl VictoryResult {
    /// Human-readable description, e.g. "Player 1 (Immune System) has
    /// secured the majority of zones".
    #[must_use]
    pub fn message(&self) -> String {
        let faction = self.winner.faction();
        let tail = match (self.reason, faction) {
            (VictoryReason::ZoneMajority, Faction::ImmuneSystem) => {
                "has secured the majority of zones"
            }
            (VictoryReason::ZoneMajority, Faction::Pathogen) => "has infected the majority of zones",
            (VictoryReason::Elimination, Faction::ImmuneSystem) => "has eliminated every pathogen",
            (VictoryReason::Elimination, Faction::Pathogen) => "has overwhelmed every immune cell",
            (VictoryReason::ResourceDepletion, _) => "has starved the opponent of energy and nutrients",
        };
        format!("Player {} ({faction}) {tail}", self.winner)
    }
}

impl fmt::Display for VictoryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Number of zones where each player holds a strict cell majority.
#[must_use]
pub fn dominated_zone_counts(state: &GameState) -> [usize; 2] {
    let mut counts = [0usize; 2];
    for zone in &state.zones {
        if let Some(player) = zone.dominant_player() {
            counts[player.index()] += 1;
        }
    }
    counts
}

/// Evaluate every victory condition in priority order.
///
/// Returns `None` while the game continues.
#[must_use]
pub fn check_victory_conditions(state: &GameState) -> Option<VictoryResult> {
    zone_majority(state)
        .or_else(|| elimination(state))
        .or_else(|| resource_depletion(state))
}

/// Evaluate victory and, when decided, store it on the state.
///
/// Moves the game into [`GamePhase::Victory`]. An already decided game keeps
/// its original result.
pub fn record_victory(state: &mut GameState) -> Option<VictoryResult> {
    if state.winner.is_some() {
        return state.winner;
    }
    let result = check_victory_conditions(state)?;
    tracing::info!(
        winner = %result.winner,
        reason = ?result.reason,
        turn = state.turn,
        "VICTORY - {}",
        result.message()
    );
    state.winner = Some(result);
    state.phase = GamePhase::Victory;
    Some(result)
}

fn zone_majority(state: &GameState) -> Option<VictoryResult> {
    let total = state.zones.len();
    let counts = dominated_zone_counts(state);
    PlayerId::ALL
        .into_iter()
        .find(|player| counts[player.index()] * 2 > total)
        .map(|winner| VictoryResult {
            winner,
            reason: VictoryReason::ZoneMajority,
        })
}

fn elimination(state: &GameState) -> Option<VictoryResult> {
    if state.turn <= state.rules.opening_rounds {
        return None;
    }
    let one = state.total_units(PlayerId::One);
    let two = state.total_units(PlayerId::Two);
    let winner = match (one, two) {
        (0, 0) => return None,
        (0, _) => PlayerId::Two,
        (_, 0) => PlayerId::One,
        _ => return None,
    };
    Some(VictoryResult {
        winner,
        reason: VictoryReason::Elimination,
    })
}

fn resource_depletion(state: &GameState) -> Option<VictoryResult> {
    PlayerId::ALL
        .into_iter()
        .find(|&player| {
            let pool = state.resources_of(player);
            pool.energy == 0 && pool.nutrients == 0
        })
        .map(|loser| VictoryResult {
            winner: loser.opponent(),
            reason: VictoryReason::ResourceDepletion,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::math::MapPos;
    use crate::resources::Resources;
    use crate::unit_kind::UnitType;
    use crate::zone::{UnitInstance, Zone, ZoneId, ZoneType};

    fn state_with_zones(count: u32) -> GameState {
        let zones = (0..count)
            .map(|i| Zone::new(ZoneId(i), ZoneType::Tissue, MapPos::new(i as i32 * 2, 0)))
            .collect();
        GameState::new(zones, RulesConfig::default()).unwrap()
    }

    fn put(state: &mut GameState, zone: usize, row: u32, col: u32, player: PlayerId) {
        let unit_type = match player {
            PlayerId::One => UnitType::TCell,
            PlayerId::Two => UnitType::Virus,
        };
        state.zones[zone]
            .grid
            .set(row, col, Some(UnitInstance::spawn(unit_type, player)));
    }

    #[test]
    fn test_no_winner_on_fresh_board() {
        let state = state_with_zones(3);
        assert_eq!(check_victory_conditions(&state), None);
    }

    #[test]
    fn test_empty_board_after_opening_is_not_elimination() {
        let mut state = state_with_zones(3);
        state.turn = 5;
        assert_eq!(check_victory_conditions(&state), None);
    }

    #[test]
    fn test_majority_needs_strictly_more_than_half() {
        let mut state = state_with_zones(4);
        put(&mut state, 0, 0, 0, PlayerId::One);
        put(&mut state, 1, 0, 0, PlayerId::One);
        put(&mut state, 2, 0, 0, PlayerId::Two);
        // 2 of 4 is not a majority
        assert_eq!(check_victory_conditions(&state), None);

        put(&mut state, 3, 0, 0, PlayerId::One);
        assert_eq!(
            check_victory_conditions(&state),
            Some(VictoryResult {
                winner: PlayerId::One,
                reason: VictoryReason::ZoneMajority
            })
        );
    }

    #[test]
    fn test_elimination_gated_by_opening_round() {
        let mut state = state_with_zones(4);
        put(&mut state, 0, 0, 0, PlayerId::One);
        assert_eq!(check_victory_conditions(&state), None);

        state.turn = 2;
        assert_eq!(
            check_victory_conditions(&state),
            Some(VictoryResult {
                winner: PlayerId::One,
                reason: VictoryReason::Elimination
            })
        );
    }

    #[test]
    fn test_elimination_outranks_depletion() {
        let mut state = state_with_zones(4);
        state.turn = 3;
        put(&mut state, 0, 0, 0, PlayerId::One);
        put(&mut state, 0, 0, 1, PlayerId::Two);
        put(&mut state, 1, 0, 0, PlayerId::Two);
        put(&mut state, 1, 0, 1, PlayerId::One);
        // Player two then loses every unit and all resources
        state.zones[0].grid.take(0, 1);
        state.zones[1].grid.take(0, 0);
        *state.resources_of_mut(PlayerId::Two) = Resources::ZERO;

        let result = check_victory_conditions(&state).unwrap();
        assert_eq!(result.winner, PlayerId::One);
        assert_eq!(result.reason, VictoryReason::Elimination);
    }

    #[test]
    fn test_depletion_requires_energy_and_nutrients() {
        let mut state = state_with_zones(2);
        *state.resources_of_mut(PlayerId::One) = Resources::new(0, 500, 50, 1);
        assert_eq!(check_victory_conditions(&state), None);

        *state.resources_of_mut(PlayerId::One) = Resources::new(0, 500, 50, 0);
        assert_eq!(
            check_victory_conditions(&state),
            Some(VictoryResult {
                winner: PlayerId::Two,
                reason: VictoryReason::ResourceDepletion
            })
        );
    }

    #[test]
    fn test_record_victory_enters_victory_phase() {
        let mut state = state_with_zones(1);
        put(&mut state, 0, 4, 4, PlayerId::Two);
        let result = record_victory(&mut state).unwrap();
        assert_eq!(result.winner, PlayerId::Two);
        assert_eq!(state.phase, GamePhase::Victory);
        assert_eq!(state.winner, Some(result));

        // The stored result sticks even if the board changes
        state.zones[0].grid.take(4, 4);
        put(&mut state, 0, 4, 4, PlayerId::One);
        assert_eq!(record_victory(&mut state), Some(result));
    }

    #[test]
    fn test_messages_name_winner_and_faction() {
        let result = VictoryResult {
            winner: PlayerId::Two,
            reason: VictoryReason::ZoneMajority,
        };
        assert_eq!(
            result.to_string(),
            "Player 2 (Pathogen) has infected the majority of zones"
        );
        let result = VictoryResult {
            winner: PlayerId::One,
            reason: VictoryReason::ZoneMajority,
        };
        assert!(result.message().contains("secured the majority of zones"));
    }
}
