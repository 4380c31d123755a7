//! The five states a turn can be in.

use serde::{Deserialize, Serialize};

/// Exactly one value is active at a time, owned by the turn controller.
///
/// There is no terminal state; the game runs indefinitely across rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GameState {
    /// Waiting for the player to start a round.
    Idle,
    /// Counting down before the frame is captured.
    Countdown { remaining: u8 },
    /// Frame captured, waiting for the classifier.
    Processing,
    /// A round finished with a recorded outcome.
    Results,
    /// A round failed; the player must explicitly retry.
    Error,
}

impl GameState {
    /// State name used in transition errors.
    pub fn name(&self) -> &'static str {
        match self {
            GameState::Idle => "idle",
            GameState::Countdown { .. } => "countdown",
            GameState::Processing => "processing",
            GameState::Results => "results",
            GameState::Error => "error",
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::Idle
    }
}
