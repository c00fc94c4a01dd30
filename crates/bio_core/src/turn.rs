//! Turn progression.
//!
//! Player one opens every round. The turn counter counts full rounds, so it
//! only advances when control passes from player two back to player one.

use crate::economy::generate_resources;
use crate::factions::PlayerId;
use crate::outcome::{ensure_running, ActionOutcome};
use crate::state::GameState;

/// Hand control to the other player.
#[must_use]
pub fn switch_player(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.current_player = state.current_player.opponent();
    if next.current_player == PlayerId::One {
        next.turn = next.turn.saturating_add(1);
    }
    next
}

/// Finish the current player's turn.
///
/// Pays zone income to both players, passes control, then evaluates
/// victory.
#[must_use]
pub fn end_turn(state: &GameState) -> ActionOutcome {
    if let Err(reason) = ensure_running(state) {
        return ActionOutcome::rejected(state, reason);
    }

    let next = switch_player(&generate_resources(state));
    tracing::debug!(
        ended = %state.current_player,
        next = %next.current_player,
        turn = next.turn,
        "Turn ended"
    );

    #[cfg(debug_assertions)]
    {
        let hash = next.state_hash();
        tracing::debug!(turn = next.turn, state_hash = hash, "Game state hash");
    }

    ActionOutcome::applied(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::error::Rejection;
    use crate::math::MapPos;
    use crate::resources::Resources;
    use crate::unit_kind::UnitType;
    use crate::victory::VictoryReason;
    use crate::zone::{UnitInstance, Zone, ZoneId, ZoneType};

    fn fresh() -> GameState {
        let zones = vec![
            Zone::new(ZoneId(0), ZoneType::Tissue, MapPos::new(0, 0)),
            Zone::new(ZoneId(1), ZoneType::Organ, MapPos::new(1, 0)),
            Zone::new(ZoneId(2), ZoneType::Barrier, MapPos::new(2, 0)),
        ];
        GameState::new(zones, RulesConfig::default()).unwrap()
    }

    #[test]
    fn test_turn_advances_after_player_two() {
        let s = fresh();
        let s = switch_player(&s);
        assert_eq!(s.current_player, PlayerId::Two);
        assert_eq!(s.turn, 1);
        let s = switch_player(&s);
        assert_eq!(s.current_player, PlayerId::One);
        assert_eq!(s.turn, 2);
    }

    #[test]
    fn test_end_turn_pays_income_and_switches() {
        let mut s = fresh();
        s.zones[1]
            .grid
            .set(0, 0, Some(UnitInstance::spawn(UnitType::Virus, PlayerId::Two)));
        s.zones[0]
            .grid
            .set(0, 0, Some(UnitInstance::spawn(UnitType::TCell, PlayerId::One)));

        let outcome = end_turn(&s);
        assert!(outcome.is_applied());
        assert_eq!(outcome.state.current_player, PlayerId::Two);
        assert_eq!(
            *outcome.state.resources_of(PlayerId::Two),
            Resources::new(1515, 210, 53, 1215)
        );
        assert_eq!(
            *outcome.state.resources_of(PlayerId::One),
            Resources::new(1205, 815, 151, 910)
        );
        assert_eq!(outcome.victory, None);
    }

    #[test]
    fn test_end_turn_detects_elimination_after_opening() {
        let mut s = fresh();
        s.current_player = PlayerId::Two;
        s.zones[0]
            .grid
            .set(0, 0, Some(UnitInstance::spawn(UnitType::Virus, PlayerId::Two)));

        let outcome = end_turn(&s);
        assert_eq!(outcome.state.turn, 2);
        let victory = outcome.victory.unwrap();
        assert_eq!(victory.winner, PlayerId::Two);
        assert_eq!(victory.reason, VictoryReason::Elimination);

        let again = end_turn(&outcome.state);
        assert_eq!(again.rejection, Some(Rejection::GameOver));
        assert_eq!(again.state, outcome.state);
    }
}
