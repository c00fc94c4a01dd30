//! Replay system for recording and playing back games.
//!
//! Replays store the initial game state and the stream of actions issued
//! during the game. Because the engine is deterministic, re-applying the
//! actions recreates every intermediate state, and the final state hash
//! proves it.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::action::{apply_action, Action};
use crate::error::{GameError, Result};
use crate::state::GameState;

/// Replay file format version for compatibility.
pub const REPLAY_VERSION: u32 = 1;

/// Complete replay data structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replay {
    /// Replay format version.
    pub version: u32,
    /// Scenario identifier or name.
    pub scenario_id: String,
    /// Serialized initial game state.
    pub initial_state: Vec<u8>,
    /// Actions in the order they were issued.
    pub actions: Vec<Action>,
    /// Final state hash for verification.
    pub final_hash: u64,
}

impl Replay {
    /// Create a new replay from a game's initial state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be serialized.
    pub fn new(scenario_id: impl Into<String>, initial_state: &GameState) -> Result<Self> {
        let state_bytes = initial_state.serialize()?;
        Ok(Self {
            version: REPLAY_VERSION,
            scenario_id: scenario_id.into(),
            initial_state: state_bytes,
            actions: Vec::new(),
            final_hash: initial_state.state_hash(),
        })
    }

    /// Play `actions` from `initial_state` and record the finished game.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or an action hits a
    /// [`GameError`].
    pub fn record_game(
        scenario_id: impl Into<String>,
        initial_state: &GameState,
        actions: &[Action],
    ) -> Result<Self> {
        let mut replay = Self::new(scenario_id, initial_state)?;
        let mut state = initial_state.clone();
        for action in actions {
            state = apply_action(&state, action)?.state;
            replay.record_action(*action);
        }
        replay.finalize(state.state_hash());
        Ok(replay)
    }

    /// Record an action for replay.
    pub fn record_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Finalize the replay with the end-game hash.
    pub fn finalize(&mut self, final_hash: u64) {
        self.final_hash = final_hash;
    }

    /// Save the replay to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self)
            .map_err(|e| GameError::Serialization(format!("Failed to serialize replay: {e}")))?;
        std::fs::write(path.as_ref(), bytes)?;
        tracing::debug!(path = %path.as_ref().display(), actions = self.actions.len(), "Replay saved");
        Ok(())
    }

    /// Load a replay from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file reading or deserialization fails, or the
    /// file was written by another format version.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        let replay: Self = bincode::deserialize(&bytes)
            .map_err(|e| GameError::Serialization(format!("Failed to deserialize replay: {e}")))?;

        if replay.version != REPLAY_VERSION {
            return Err(GameError::InvalidState(format!(
                "Replay version mismatch: expected {REPLAY_VERSION}, got {}",
                replay.version
            )));
        }

        Ok(replay)
    }

    /// Get the initial game state for playback.
    ///
    /// # Errors
    ///
    /// Returns an error if state deserialization fails.
    pub fn restore_initial_state(&self) -> Result<GameState> {
        GameState::deserialize(&self.initial_state)
    }

    /// Get the total number of actions in the replay.
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }
}

/// Replay playback controller.
#[derive(Debug)]
pub struct ReplayPlayer {
    replay: Replay,
    state: GameState,
    position: usize,
}

impl ReplayPlayer {
    /// Create a new replay player from a replay.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial state cannot be restored.
    pub fn new(replay: Replay) -> Result<Self> {
        let state = replay.restore_initial_state()?;
        Ok(Self {
            replay,
            state,
            position: 0,
        })
    }

    /// Apply the next recorded action.
    ///
    /// Returns true if there are more actions to play.
    ///
    /// # Errors
    ///
    /// Propagates a [`GameError`] raised by the action.
    pub fn advance(&mut self) -> Result<bool> {
        if let Some(action) = self.replay.actions.get(self.position) {
            self.state = apply_action(&self.state, action)?.state;
            self.position += 1;
        }
        Ok(!self.is_finished())
    }

    /// Seek to just after the first `target` actions.
    ///
    /// # Errors
    ///
    /// Returns an error if state restoration or an action fails.
    pub fn seek(&mut self, target: usize) -> Result<()> {
        self.state = self.replay.restore_initial_state()?;
        self.position = 0;
        let end = target.min(self.replay.actions.len());
        while self.position < end {
            self.advance()?;
        }
        Ok(())
    }

    /// Number of actions applied so far.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get a reference to the current game state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Get the replay being played.
    #[must_use]
    pub const fn replay(&self) -> &Replay {
        &self.replay
    }

    /// Check if the replay has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.position >= self.replay.actions.len()
    }

    /// Verify the replay produces the expected final hash.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ReplayMismatch`] if the hashes differ, or any
    /// error raised while replaying.
    pub fn verify(&mut self) -> Result<()> {
        self.seek(self.replay.actions.len())?;
        let actual = self.state.state_hash();
        if actual == self.replay.final_hash {
            Ok(())
        } else {
            Err(GameError::ReplayMismatch {
                expected: self.replay.final_hash,
                actual,
            })
        }
    }

    /// Get progress as a percentage (0-100).
    #[must_use]
    pub fn progress_percent(&self) -> u32 {
        let total = self.replay.actions.len();
        if total == 0 {
            100
        } else {
            u32::try_from(self.position * 100 / total).unwrap_or(100)
        }
    }
}
