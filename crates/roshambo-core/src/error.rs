//! Error types for the roshambo game.

use serde::Serialize;
use thiserror::Error;

/// A shared error type for the whole game.
///
/// Variants are structured so callers can react to the failure class, while
/// [`RoshamboError::user_message`] flattens them into the text shown to the
/// player.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RoshamboError {
    /// The camera stream could not be acquired or a frame capture failed.
    #[error("Camera unavailable: {reason}")]
    CameraUnavailable { reason: String },

    /// The classifier answered, but could not identify one of the three
    /// gestures.
    #[error("no recognizable gesture in the captured frame")]
    GestureUnrecognized,

    /// The classifier call itself failed (network, service, or an
    /// unparseable response).
    #[error("Classifier error: {message}")]
    Classifier { message: String },

    /// A state machine operation was attempted from the wrong state.
    #[error("Cannot {action} while in the {from} state")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },

    /// A round outcome arrived for a round that has been superseded.
    #[error("Stale round: expected token {expected}, got {got}")]
    StaleRound { expected: u64, got: u64 },

    /// Configuration error (credentials, capture command templates).
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RoshamboError {
    /// Creates a CameraUnavailable error
    pub fn camera_unavailable(reason: impl Into<String>) -> Self {
        Self::CameraUnavailable {
            reason: reason.into(),
        }
    }

    /// Creates a Classifier error
    pub fn classifier(message: impl Into<String>) -> Self {
        Self::Classifier {
            message: message.into(),
        }
    }

    /// Creates an InvalidTransition error
    pub fn invalid_transition(from: &'static str, action: &'static str) -> Self {
        Self::InvalidTransition { from, action }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// The message shown to the player.
    ///
    /// Classifier transport failures are deliberately indistinguishable from
    /// an unrecognized gesture here; the player's recovery action is the same
    /// either way.
    pub fn user_message(&self) -> String {
        match self {
            Self::CameraUnavailable { .. } => {
                "Camera access failed. Check the device and try again.".to_string()
            }
            Self::GestureUnrecognized | Self::Classifier { .. } => {
                "Could not detect a valid gesture. Make sure your hand is clear and try again."
                    .to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for RoshamboError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, RoshamboError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failure_reads_like_unrecognized_gesture() {
        let unrecognized = RoshamboError::GestureUnrecognized;
        let transport = RoshamboError::classifier("503 from upstream");
        assert_eq!(unrecognized.user_message(), transport.user_message());
    }

    #[test]
    fn camera_failure_keeps_its_own_message() {
        let err = RoshamboError::camera_unavailable("permission denied");
        assert!(err.user_message().contains("Camera"));
        assert!(err.to_string().contains("permission denied"));
    }
}
