//! The turn controller: one explicit state machine owning all mutable game
//! state.
//!
//! Every transition is a method returning `Result`; fields are never mutated
//! from outside. The controller is purely synchronous - the async driver in
//! [`crate::session`] owns the clock and the external collaborators.

use crate::error::{Result, RoshamboError};
use crate::gesture::Gesture;
use crate::outcome::decide;
use crate::round::{RoundResult, SessionLog};
use crate::state::GameState;

/// Countdown length at the start of every round.
pub const COUNTDOWN_START: u8 = 3;

/// Identifies one started round.
///
/// Resolving or failing a round requires the matching token, so a classifier
/// response that arrives for a superseded round is rejected explicitly
/// instead of relying on the UI never allowing overlapping rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundToken(u64);

/// What a countdown tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting down; `remaining` is the value to display.
    Continue { remaining: u8 },
    /// The countdown elapsed: capture a frame and classify it now.
    Capture { token: RoundToken },
}

/// Owns the game state, the session log, the last result, the error message,
/// and the camera flag.
#[derive(Debug, Default)]
pub struct TurnController {
    state: GameState,
    camera_on: bool,
    log: SessionLog,
    last_result: Option<RoundResult>,
    error: Option<String>,
    round_seq: u64,
}

impl TurnController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The camera flag is orthogonal to the game state: it is set once the
    /// stream is acquired and never toggled by round transitions.
    pub fn set_camera(&mut self, on: bool) {
        self.camera_on = on;
    }

    pub fn camera_on(&self) -> bool {
        self.camera_on
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    pub fn last_result(&self) -> Option<&RoundResult> {
        self.last_result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Idle -> Countdown(3). Requires the camera to be on; clears any
    /// previous result and error.
    pub fn start_round(&mut self) -> Result<RoundToken> {
        if !self.camera_on {
            return Err(RoshamboError::camera_unavailable(
                "the camera stream is not available",
            ));
        }
        match self.state {
            GameState::Idle => {
                self.error = None;
                self.last_result = None;
                self.round_seq += 1;
                self.state = GameState::Countdown {
                    remaining: COUNTDOWN_START,
                };
                Ok(RoundToken(self.round_seq))
            }
            other => Err(RoshamboError::invalid_transition(other.name(), "start a round")),
        }
    }

    /// One countdown tick. Countdown(n>0) -> Countdown(n-1);
    /// Countdown(0) -> Processing, which obliges the caller to make exactly
    /// one capture-and-classify attempt.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        match self.state {
            GameState::Countdown { remaining: 0 } => {
                self.state = GameState::Processing;
                Ok(TickOutcome::Capture {
                    token: RoundToken(self.round_seq),
                })
            }
            GameState::Countdown { remaining } => {
                let remaining = remaining - 1;
                self.state = GameState::Countdown { remaining };
                Ok(TickOutcome::Continue { remaining })
            }
            other => Err(RoshamboError::invalid_transition(other.name(), "tick")),
        }
    }

    /// Processing -> Results. Computes the winner, appends a log entry, and
    /// keeps the result for display.
    pub fn resolve(
        &mut self,
        token: RoundToken,
        user: Gesture,
        computer: Gesture,
    ) -> Result<&RoundResult> {
        self.guard_processing(token, "resolve the round")?;
        let winner = decide(user, computer);
        self.log.append(user, computer, winner);
        self.state = GameState::Results;
        Ok(self.last_result.insert(RoundResult {
            user,
            computer,
            winner,
        }))
    }

    /// Processing -> Error. No log entry is appended and nothing is retried;
    /// the message is surfaced to the player as-is.
    pub fn fail(&mut self, token: RoundToken, message: impl Into<String>) -> Result<()> {
        self.guard_processing(token, "fail the round")?;
        self.state = GameState::Error;
        self.error = Some(message.into());
        Ok(())
    }

    /// Results/Error -> Idle, clearing the last result and the error. The
    /// only way the player restarts.
    pub fn play_again(&mut self) -> Result<()> {
        match self.state {
            GameState::Results | GameState::Error => {
                self.state = GameState::Idle;
                self.error = None;
                self.last_result = None;
                Ok(())
            }
            other => Err(RoshamboError::invalid_transition(other.name(), "play again")),
        }
    }

    fn guard_processing(&self, token: RoundToken, action: &'static str) -> Result<()> {
        if self.state != GameState::Processing {
            return Err(RoshamboError::invalid_transition(self.state.name(), action));
        }
        if token.0 != self.round_seq {
            return Err(RoshamboError::StaleRound {
                expected: self.round_seq,
                got: token.0,
            });
        }
        Ok(())
    }
}
