//! Frame capture by spawning an external command.
//!
//! The command template contains an `{output}` placeholder; each snapshot
//! substitutes a fresh temp file path, runs the command, and reads the
//! written image back. The default template is a one-frame ffmpeg grab from
//! a video4linux device.

use async_trait::async_trait;
use roshambo_core::{Frame, FrameSource, Result, RoshamboError};
use tokio::process::Command;
use tracing::debug;

/// Placeholder replaced with the snapshot's temp file path.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Captures stills by running a configurable external command.
pub struct CommandFrameSource {
    program: String,
    args: Vec<String>,
}

impl CommandFrameSource {
    /// One-frame JPEG grab from a v4l2 device via ffmpeg.
    pub fn ffmpeg(device: impl Into<String>) -> Self {
        Self {
            program: "ffmpeg".to_string(),
            args: [
                "-loglevel",
                "error",
                "-f",
                "video4linux2",
                "-i",
                &device.into(),
                "-frames:v",
                "1",
                "-y",
                OUTPUT_PLACEHOLDER,
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }

    /// Builds a source from a whitespace-separated command template, e.g.
    /// `fswebcam --no-banner {output}`. The template must name a program and
    /// contain the `{output}` placeholder exactly once.
    pub fn from_template(template: &str) -> Result<Self> {
        let mut words = template.split_whitespace().map(str::to_string);
        let program = words
            .next()
            .ok_or_else(|| RoshamboError::config("capture command template is empty"))?;
        let args: Vec<String> = words.collect();

        if args.iter().filter(|a| a.as_str() == OUTPUT_PLACEHOLDER).count() != 1 {
            return Err(RoshamboError::config(format!(
                "capture command template must contain {OUTPUT_PLACEHOLDER} exactly once",
            )));
        }

        Ok(Self { program, args })
    }
}

#[async_trait]
impl FrameSource for CommandFrameSource {
    /// Verifies the capture program exists on PATH. The device itself is
    /// only touched per-snapshot.
    async fn acquire(&self) -> Result<()> {
        #[cfg(unix)]
        let check_cmd = "which";
        #[cfg(windows)]
        let check_cmd = "where";

        let output = Command::new(check_cmd)
            .arg(&self.program)
            .output()
            .await
            .map_err(|e| {
                RoshamboError::camera_unavailable(format!(
                    "failed to look up capture program '{}': {e}",
                    self.program
                ))
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(RoshamboError::camera_unavailable(format!(
                "capture program '{}' not found in PATH",
                self.program
            )))
        }
    }

    async fn snapshot(&self) -> Result<Frame> {
        let output_file = tempfile::Builder::new()
            .prefix("roshambo-frame-")
            .suffix(".jpg")
            .tempfile()
            .map_err(|e| {
                RoshamboError::camera_unavailable(format!("could not create frame file: {e}"))
            })?;
        let output_path = output_file.path().to_string_lossy().to_string();

        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| arg.replace(OUTPUT_PLACEHOLDER, &output_path))
            .collect();
        debug!(program = %self.program, ?args, "running capture command");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|e| {
                RoshamboError::camera_unavailable(format!(
                    "capture command '{}' failed to start: {e}",
                    self.program
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RoshamboError::camera_unavailable(format!(
                "capture command '{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let bytes = tokio::fs::read(output_file.path()).await.map_err(|e| {
            RoshamboError::camera_unavailable(format!("could not read captured frame: {e}"))
        })?;
        if bytes.is_empty() {
            return Err(RoshamboError::camera_unavailable(
                "capture command produced an empty frame",
            ));
        }

        Ok(Frame::jpeg(bytes))
    }
}
