//! Result of applying one action.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Rejection, Result};
use crate::state::GameState;
use crate::victory::{self, VictoryResult};

/// State after an action, plus why it was refused or who won.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// New state. Identical to the input when the action was rejected.
    pub state: GameState,
    /// Reason the action was refused, if it was.
    pub rejection: Option<Rejection>,
    /// Winner, once decided.
    pub victory: Option<VictoryResult>,
}

impl ActionOutcome {
    /// Wrap a successfully mutated state.
    ///
    /// Control flags are recomputed and victory is evaluated.
    #[must_use]
    pub fn applied(mut state: GameState) -> Self {
        state.refresh_control();

        if cfg!(feature = "debug-validation") {
            if let Err(err) = state.validate() {
                tracing::error!(%err, "Applied action broke a state invariant");
            }
        }

        let victory = victory::record_victory(&mut state);
        Self {
            state,
            rejection: None,
            victory,
        }
    }

    /// Hand back the untouched state with a reason.
    #[must_use]
    pub fn rejected(state: &GameState, reason: Rejection) -> Self {
        tracing::debug!(player = %state.current_player, %reason, "Action rejected");
        Self {
            state: state.clone(),
            rejection: Some(reason),
            victory: state.winner,
        }
    }

    /// Whether the action took effect.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        self.rejection.is_none()
    }

    /// Turn an attempt into an outcome against the original state.
    ///
    /// # Errors
    ///
    /// Propagates the [`GameError`] of a failed attempt.
    pub(crate) fn resolve(original: &GameState, attempt: Attempt) -> Result<Self> {
        match attempt {
            Ok(next) => Ok(Self::applied(next)),
            Err(Refusal::Rejected(reason)) => Ok(Self::rejected(original, reason)),
            Err(Refusal::Failed(err)) => Err(err),
        }
    }
}

/// Either kind of failure an engine operation can hit along the way.
#[derive(Debug)]
pub(crate) enum Refusal {
    Rejected(Rejection),
    Failed(GameError),
}

impl From<Rejection> for Refusal {
    fn from(reason: Rejection) -> Self {
        Self::Rejected(reason)
    }
}

impl From<GameError> for Refusal {
    fn from(err: GameError) -> Self {
        Self::Failed(err)
    }
}

/// Mutated state or the reason it could not be produced.
pub(crate) type Attempt = std::result::Result<GameState, Refusal>;

/// Reject everything once a winner exists.
pub(crate) const fn ensure_running(state: &GameState) -> std::result::Result<(), Rejection> {
    if state.is_over() {
        Err(Rejection::GameOver)
    } else {
        Ok(())
    }
}
