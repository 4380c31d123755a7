//! Domain core for roshambo: the gestures, the outcome rule, the turn state
//! machine, the session log, and the boundary traits for the camera and the
//! vision classifier.
//!
//! Everything here is I/O-free; concrete collaborators live in
//! `roshambo-capture` and `roshambo-vision`, and the `roshambo` binary wires
//! them together.

pub mod boundary;
pub mod controller;
pub mod error;
pub mod gesture;
pub mod outcome;
pub mod round;
pub mod session;
pub mod state;

pub use boundary::{Detection, Frame, FrameSource, GestureClassifier};
pub use controller::{COUNTDOWN_START, RoundToken, TickOutcome, TurnController};
pub use error::{Result, RoshamboError};
pub use gesture::Gesture;
pub use outcome::{Winner, decide};
pub use round::{LogEntry, RoundResult, SessionLog};
pub use session::{GameSession, RoundEvent};
pub use state::GameState;
