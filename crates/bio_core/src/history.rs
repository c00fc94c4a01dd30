//! Undo/redo over game state snapshots.
//!
//! Snapshots are whole [`GameState`] values, which the engine never mutates
//! in place, so stepping back is a pointer move rather than a rollback.

use crate::action::{apply_action, Action};
use crate::error::Result;
use crate::outcome::ActionOutcome;
use crate::state::GameState;

/// Default number of undo steps retained.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Linear undo/redo history.
#[derive(Debug, Clone)]
pub struct History {
    past: Vec<GameState>,
    present: GameState,
    future: Vec<GameState>,
    limit: usize,
}

impl History {
    /// Start a history at `state`.
    #[must_use]
    pub fn new(state: GameState) -> Self {
        Self::with_limit(state, DEFAULT_HISTORY_LIMIT)
    }

    /// Start a history keeping at most `limit` undo steps.
    #[must_use]
    pub fn with_limit(state: GameState, limit: usize) -> Self {
        Self {
            past: Vec::new(),
            present: state,
            future: Vec::new(),
            limit,
        }
    }

    /// The current state.
    #[must_use]
    pub const fn current(&self) -> &GameState {
        &self.present
    }

    /// Record a new state. Clears anything that could be redone.
    pub fn push(&mut self, state: GameState) {
        let previous = std::mem::replace(&mut self.present, state);
        self.past.push(previous);
        if self.past.len() > self.limit {
            let excess = self.past.len() - self.limit;
            self.past.drain(..excess);
        }
        self.future.clear();
    }

    /// Apply an action to the current state, recording it if it took effect.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`apply_action`]; the history is unchanged.
    pub fn apply(&mut self, action: &Action) -> Result<ActionOutcome> {
        let outcome = apply_action(&self.present, action)?;
        if outcome.is_applied() {
            self.push(outcome.state.clone());
        }
        Ok(outcome)
    }

    /// Step back one state. Returns `false` if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let undone = std::mem::replace(&mut self.present, previous);
        self.future.push(undone);
        true
    }

    /// Step forward one undone state. Returns `false` if there is nothing to
    /// redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        let redone = std::mem::replace(&mut self.present, next);
        self.past.push(redone);
        true
    }

    /// Check if an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Check if a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undo steps held.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.past.len()
    }
}
