//! Credential lookup for the Gemini classifier.
//!
//! The key comes from the `GEMINI_API_KEY` environment variable, with a
//! fallback to `~/.config/roshambo/secret.json`. A missing key is not an
//! error at this layer; the classifier degrades to "always unrecognized".

use roshambo_core::{Result, RoshamboError};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Environment variable consulted first.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Root structure of secret.json
#[derive(Debug, Clone, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
}

/// Gemini API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

/// Looks up the API key and optional model override, environment first,
/// secret file second. Returns `None` when neither source has a key.
pub fn resolve_credentials() -> Option<GeminiConfig> {
    if let Ok(api_key) = std::env::var(API_KEY_ENV) {
        if !api_key.trim().is_empty() {
            return Some(GeminiConfig {
                api_key,
                model_name: None,
            });
        }
    }
    load_secret_config().ok().and_then(|config| config.gemini)
}

/// Loads the secret configuration file from ~/.config/roshambo/secret.json
pub fn load_secret_config() -> Result<SecretConfig> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        return Err(RoshamboError::config(format!(
            "Configuration file not found at: {}",
            config_path.display()
        )));
    }

    let content = fs::read_to_string(&config_path).map_err(|e| {
        RoshamboError::config(format!(
            "Failed to read configuration file at {}: {}",
            config_path.display(),
            e
        ))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        RoshamboError::config(format!(
            "Failed to parse configuration file at {}: {}",
            config_path.display(),
            e
        ))
    })
}

/// Returns the path to the configuration file: ~/.config/roshambo/secret.json
fn get_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| RoshamboError::config("Could not determine home directory"))?;
    Ok(home.join(".config").join("roshambo").join("secret.json"))
}
