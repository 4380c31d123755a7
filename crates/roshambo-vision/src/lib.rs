//! Vision-service integration for roshambo.
//!
//! Implements the core's `GestureClassifier` boundary against the Gemini
//! REST API, plus the credential lookup that backs it.

pub mod config;
pub mod gemini;

pub use config::{GeminiConfig, SecretConfig};
pub use gemini::GeminiClassifier;
