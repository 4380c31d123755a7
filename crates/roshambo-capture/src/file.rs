//! A frame source that serves a fixed still image from disk.
//!
//! Lets the game run without a webcam (point it at a photo of your hand)
//! and backs the integration tests.

use async_trait::async_trait;
use roshambo_core::{Frame, FrameSource, Result, RoshamboError};
use std::path::{Path, PathBuf};

pub struct FileFrameSource {
    path: PathBuf,
}

impl FileFrameSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FrameSource for FileFrameSource {
    async fn acquire(&self) -> Result<()> {
        tokio::fs::metadata(&self.path).await.map_err(|e| {
            RoshamboError::camera_unavailable(format!(
                "image {} is not readable: {e}",
                self.path.display()
            ))
        })?;
        Ok(())
    }

    async fn snapshot(&self) -> Result<Frame> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            RoshamboError::camera_unavailable(format!(
                "could not read image {}: {e}",
                self.path.display()
            ))
        })?;
        Ok(Frame::new(bytes, mime_for_path(&self.path)))
    }
}

fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
