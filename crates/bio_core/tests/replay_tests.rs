//! Recorded games and undo history.

use bio_core::error::GameError;
use bio_core::prelude::*;
use bio_test_utils::fixtures::standard_state;
use bio_test_utils::init_tracing;

fn skirmish() -> Vec<Action> {
    vec![
        Action::SpawnUnit {
            zone: ZoneId(1),
            row: 4,
            col: 4,
            unit_type: UnitType::Macrophage,
        },
        Action::ExpandZone(ExpansionRequest::immune_response(ZoneId(0), ZoneId(1))),
        Action::EndTurn,
        Action::SpawnUnit {
            zone: ZoneId(14),
            row: 4,
            col: 4,
            unit_type: UnitType::Parasite,
        },
        Action::ExpandZone(ExpansionRequest::infect(ZoneId(15), ZoneId(11))),
        Action::EndTurn,
    ]
}

#[test]
fn saved_replay_reproduces_the_game() {
    init_tracing();
    let initial = standard_state();
    let replay = Replay::record_game("standard", &initial, &skirmish()).unwrap();
    assert_eq!(replay.action_count(), 6);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("skirmish.replay");
    replay.save(&path).unwrap();
    let loaded = Replay::load(&path).unwrap();
    assert_eq!(loaded.scenario_id, "standard");
    assert_eq!(loaded.restore_initial_state().unwrap(), initial);

    let mut player = ReplayPlayer::new(loaded).unwrap();
    player.verify().unwrap();
    assert!(player.is_finished());
    assert_eq!(player.progress_percent(), 100);
    assert_eq!(player.state().turn, 2);
}

#[test]
fn tampered_replay_is_detected() {
    let initial = standard_state();
    let mut replay = Replay::record_game("standard", &initial, &skirmish()).unwrap();
    replay.actions.pop();

    let mut player = ReplayPlayer::new(replay).unwrap();
    assert!(matches!(
        player.verify(),
        Err(GameError::ReplayMismatch { .. })
    ));
}

#[test]
fn seeking_matches_stepping() {
    let initial = standard_state();
    let replay = Replay::record_game("standard", &initial, &skirmish()).unwrap();

    let mut stepped = ReplayPlayer::new(replay.clone()).unwrap();
    for _ in 0..3 {
        assert!(stepped.advance().unwrap());
    }
    let mut sought = ReplayPlayer::new(replay).unwrap();
    sought.seek(5).unwrap();
    sought.seek(3).unwrap();

    assert_eq!(stepped.position(), 3);
    assert_eq!(sought.position(), 3);
    assert_eq!(stepped.state(), sought.state());
    assert_eq!(stepped.state().current_player, PlayerId::Two);
}

#[test]
fn undo_walks_back_through_applied_actions_only() {
    init_tracing();
    let mut history = History::new(standard_state());
    let start = history.current().clone();

    let outcome = history.apply(&skirmish()[0]).unwrap();
    assert!(outcome.is_applied());
    let after_spawn = history.current().clone();

    // Occupied cell, rejected and not recorded
    let outcome = history.apply(&skirmish()[0]).unwrap();
    assert_eq!(outcome.rejection, Some(Rejection::CellOccupied));
    assert_eq!(history.depth(), 1);

    history.apply(&Action::EndTurn).unwrap();
    assert_eq!(history.current().current_player, PlayerId::Two);

    assert!(history.undo());
    assert_eq!(history.current(), &after_spawn);
    assert!(history.undo());
    assert_eq!(history.current(), &start);
    assert!(!history.undo());

    assert!(history.redo());
    assert_eq!(history.current(), &after_spawn);
    assert!(history.can_redo());

    // A new action drops the redo branch
    history.apply(&Action::SelectZone(ZoneId(3))).unwrap();
    assert!(!history.can_redo());
}
