//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the engine produces identical
//! results given identical inputs.
//!
//! # Testing Strategy
//!
//! Replays and undo/redo only work if the engine is 100% deterministic.
//! Sources of non-determinism include:
//!
//! - **Floating-point math**: We use fixed-point arithmetic via
//!   [`bio_core::math::Fixed`] and integer percentages throughout.
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Zones live in an ordered `Vec` and are always walked in order.
//!
//! - **System randomness**: The engine has none.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Individual operations (placement, income, expansion)
//! 2. **Property tests**: Random action streams still produce deterministic
//!    outputs
//! 3. **Integration tests**: Full scenarios are reproducible
//! 4. **Parallel tests**: Running N games on N threads all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use bio_core::action::{apply_action, Action};
use bio_core::state::GameState;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of steps applied per run.
    pub steps: usize,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic engine).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the engine was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Engine is non-deterministic!\n\
                 Runs: {}\n\
                 Steps: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.steps,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a process multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run
/// * `steps` - Number of steps per run
/// * `setup` - Function to create the initial state
/// * `step` - Function to advance the state by one step
/// * `hash` - Function to compute the state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    steps: usize,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S, usize),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for index in 0..steps {
            step(&mut state, index);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        steps,
    }
}

/// Apply `actions` in order, ignoring rejections and engine errors.
///
/// Errors leave the state where it was, so random action streams can be
/// fed in without pre-filtering.
#[must_use]
pub fn play(initial: &GameState, actions: &[Action]) -> GameState {
    actions.iter().fold(initial.clone(), |state, action| {
        match apply_action(&state, action) {
            Ok(outcome) => outcome.state,
            Err(_) => state,
        }
    })
}

/// Play the same action stream from the same setup `runs` times.
pub fn verify_game_determinism<F>(setup_fn: F, actions: &[Action], runs: usize) -> DeterminismResult
where
    F: Fn() -> GameState,
{
    verify_determinism(
        runs,
        actions.len(),
        setup_fn,
        |state, index| {
            *state = play(state, &actions[index..=index]);
        },
        GameState::state_hash,
    )
}

/// Play the same game on `num_games` scoped threads and collect final
/// hashes.
///
/// # Panics
///
/// Panics if a worker thread panics.
pub fn run_parallel_games<F>(setup_fn: F, actions: &[Action], num_games: usize) -> Vec<u64>
where
    F: Fn() -> GameState + Sync,
{
    thread::scope(|s| {
        let handles: Vec<_> = (0..num_games)
            .map(|_| s.spawn(|| play(&setup_fn(), actions).state_hash()))
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

/// Compare two runs step by step, finding the first divergence.
///
/// # Returns
///
/// `None` if the runs agree throughout, `Some(step)` if they diverge after
/// that many actions.
pub fn find_first_divergence<F>(setup_fn: F, actions: &[Action]) -> Option<usize>
where
    F: Fn() -> GameState,
{
    let mut a = setup_fn();
    let mut b = setup_fn();

    if a.state_hash() != b.state_hash() {
        return Some(0);
    }

    for (index, action) in actions.iter().enumerate() {
        a = play(&a, std::slice::from_ref(action));
        b = play(&b, std::slice::from_ref(action));

        if a.state_hash() != b.state_hash() {
            return Some(index + 1);
        }
    }

    None
}

/// Verify that a bincode round trip preserves the state exactly.
pub fn verify_serialization_determinism(state: &GameState) -> bool {
    let Ok(bytes) = state.serialize() else {
        return false;
    };
    let Ok(restored) = GameState::deserialize(&bytes) else {
        return false;
    };
    restored == *state && restored.state_hash() == state.state_hash()
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for engine testing.
///
/// These strategies generate random but reproducible inputs for
/// property-based testing.
pub mod strategies {
    use bio_core::action::Action;
    use bio_core::expansion::ExpansionRequest;
    use bio_core::resources::Resources;
    use bio_core::unit_kind::UnitType;
    use bio_core::zone::{ZoneId, ZoneType, GRID_SIZE};
    use proptest::prelude::*;

    /// Any unit type.
    pub fn arb_unit_type() -> impl Strategy<Value = UnitType> {
        proptest::sample::select(UnitType::ALL.to_vec())
    }

    /// Any zone type.
    pub fn arb_zone_type() -> impl Strategy<Value = ZoneType> {
        proptest::sample::select(ZoneType::ALL.to_vec())
    }

    /// A grid cell, occasionally just outside the grid.
    pub fn arb_cell() -> impl Strategy<Value = (u32, u32)> {
        (0..=GRID_SIZE, 0..=GRID_SIZE)
    }

    /// A zone id below `zone_count`.
    pub fn arb_zone(zone_count: u32) -> impl Strategy<Value = ZoneId> {
        (0..zone_count.max(1)).prop_map(ZoneId)
    }

    /// A resource pool with each component below `max`.
    pub fn arb_resources(max: u32) -> impl Strategy<Value = Resources> {
        (0..max, 0..max, 0..max, 0..max)
            .prop_map(|(e, a, s, n)| Resources::new(e, a, s, n))
    }

    /// A unit deployment.
    pub fn arb_spawn(zone_count: u32) -> impl Strategy<Value = Action> {
        (arb_zone(zone_count), arb_cell(), arb_unit_type()).prop_map(
            |(zone, (row, col), unit_type)| Action::SpawnUnit {
                zone,
                row,
                col,
                unit_type,
            },
        )
    }

    /// An expansion of any kind between existing zones.
    pub fn arb_expansion(zone_count: u32) -> impl Strategy<Value = Action> {
        (
            0..4u8,
            arb_zone(zone_count),
            arb_zone(zone_count),
            arb_zone_type(),
        )
            .prop_map(|(kind, source, target, zone_type)| {
                Action::ExpandZone(match kind {
                    0 => ExpansionRequest::create(source, zone_type),
                    1 => ExpansionRequest::infect(source, target),
                    2 => ExpansionRequest::immune_response(source, target),
                    _ => ExpansionRequest::conquer(source, target),
                })
            })
    }

    /// Any action addressing zones below `zone_count`.
    pub fn arb_action(zone_count: u32) -> impl Strategy<Value = Action> {
        prop_oneof![
            3 => arb_spawn(zone_count),
            2 => (arb_zone(zone_count), arb_cell(), arb_cell())
                .prop_map(|(zone, from, to)| Action::MoveUnit { zone, from, to }),
            2 => (arb_zone(zone_count), arb_cell(), arb_cell()).prop_map(
                |(zone, attacker, target)| Action::AttackPosition {
                    zone,
                    attacker,
                    target
                }
            ),
            1 => (arb_zone(zone_count), arb_cell(), 0..3u8)
                .prop_map(|(zone, cell, slot)| Action::UseSpecialAbility { zone, cell, slot }),
            2 => Just(Action::EndTurn),
            1 => arb_expansion(zone_count),
            1 => arb_zone(zone_count).prop_map(Action::SelectZone),
        ]
    }

    /// Generate a sequence of actions.
    pub fn arb_action_sequence(
        zone_count: u32,
        max_len: usize,
    ) -> impl Strategy<Value = Vec<Action>> {
        proptest::collection::vec(arb_action(zone_count), 0..max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::standard_state;
    use bio_core::unit_kind::UnitType;
    use bio_core::zone::ZoneId;
    use proptest::prelude::*;

    fn opening() -> Vec<Action> {
        vec![
            Action::SpawnUnit {
                zone: ZoneId(1),
                row: 0,
                col: 0,
                unit_type: UnitType::NeutrophilCell,
            },
            Action::EndTurn,
            Action::SpawnUnit {
                zone: ZoneId(14),
                row: 3,
                col: 3,
                unit_type: UnitType::Toxin,
            },
            Action::EndTurn,
        ]
    }

    #[test]
    fn test_verify_determinism_basic() {
        let result = verify_game_determinism(standard_state, &opening(), 3);
        result.assert_deterministic();
        assert_eq!(result.unique_hashes().len(), 1);
        assert_eq!(result.steps, 4);
    }

    #[test]
    fn test_detects_non_determinism() {
        use std::cell::Cell;
        let counter = Cell::new(0u64);
        let result = verify_determinism(
            2,
            1,
            || {
                counter.set(counter.get() + 1);
                counter.get()
            },
            |_, _| {},
            |value| *value,
        );
        assert!(!result.is_deterministic);
    }

    #[test]
    fn test_parallel_games_match() {
        let hashes = run_parallel_games(standard_state, &opening(), 4);
        assert_eq!(hashes.len(), 4);
        assert!(hashes.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_no_divergence() {
        assert_eq!(find_first_divergence(standard_state, &opening()), None);
    }

    #[test]
    fn test_serialization_round_trip() {
        let state = play(&standard_state(), &opening());
        assert!(verify_serialization_determinism(&state));
    }

    #[test]
    fn test_compute_hash_stable() {
        assert_eq!(compute_hash(&(1, 2, 3)), compute_hash(&(1, 2, 3)));
    }

    proptest! {
        #[test]
        fn prop_random_games_are_deterministic(
            actions in strategies::arb_action_sequence(16, 40)
        ) {
            let result = verify_game_determinism(standard_state, &actions, 2);
            prop_assert!(result.is_deterministic);
        }
    }
}
