//! Boundary traits for the two external collaborators: the camera and the
//! gesture classifier.
//!
//! The core never touches a device or the network itself; it awaits these
//! two abstract operations sequentially. Implementations live in the
//! `roshambo-capture` and `roshambo-vision` crates.

use crate::error::Result;
use crate::gesture::Gesture;
use async_trait::async_trait;

/// A still image snapshotted from the live camera feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl Frame {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "image/jpeg")
    }
}

/// What the classifier saw in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    Gesture(Gesture),
    Unrecognized,
}

impl Detection {
    /// Parses the classifier's textual answer. Anything that is not one of
    /// the three gesture tokens (including `NONE`) is `Unrecognized`.
    pub fn from_token(token: &str) -> Self {
        match Gesture::from_token(token) {
            Some(gesture) => Detection::Gesture(gesture),
            None => Detection::Unrecognized,
        }
    }
}

/// Access to a live video stream and the ability to snapshot one still frame
/// at a controller-requested instant.
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Opens or verifies the stream once at startup. Failure means the
    /// camera banner is shown and rounds cannot start; it never crashes the
    /// state machine.
    async fn acquire(&self) -> Result<()>;

    /// Captures one still frame from the live feed.
    async fn snapshot(&self) -> Result<Frame>;
}

/// The remote vision service. One call per round, no streaming, no batching,
/// no retry.
#[async_trait]
pub trait GestureClassifier: Send + Sync {
    async fn classify(&self, frame: &Frame) -> Result<Detection>;
}
