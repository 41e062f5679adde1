//! Client configuration.
//!
//! Credential priority: `~/.config/sensei/secret.json`, then the
//! `ANTHROPIC_API_KEY` environment variable. A missing credential is a
//! fatal configuration error at construction time; it never enters the
//! per-request retry flow.

use sensei_core::{Result, SenseiError};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Model pinned for all coaching requests.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Fixed output-token ceiling per response.
pub const MAX_OUTPUT_TOKENS: u32 = 4096;

/// Fixed sampling temperature.
pub const SAMPLING_TEMPERATURE: f32 = 0.7;

/// Configuration for the upstream model client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ClientConfig {
    /// Creates a config with the pinned request parameters.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: SAMPLING_TEMPERATURE,
        }
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Loads configuration from `~/.config/sensei/secret.json` or
    /// environment variables.
    pub fn try_from_env() -> Result<Self> {
        if let Some(path) = secret_file_path() {
            if let Some(api_key) = load_secret_file(&path) {
                return Ok(Self::new(api_key));
            }
        }

        let api_key = env::var("ANTHROPIC_API_KEY").map_err(|_| {
            SenseiError::config(
                "ANTHROPIC_API_KEY not found in ~/.config/sensei/secret.json or environment variables",
            )
        })?;
        Ok(Self::new(api_key))
    }
}

/// Root structure of secret.json
#[derive(Debug, Deserialize)]
struct SecretConfig {
    #[serde(default)]
    anthropic: Option<AnthropicSecret>,
}

#[derive(Debug, Deserialize)]
struct AnthropicSecret {
    api_key: String,
}

fn secret_file_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("sensei").join("secret.json"))
}

fn load_secret_file(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    let parsed: SecretConfig = serde_json::from_str(&content).ok()?;
    parsed.anthropic.map(|a| a.api_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_new_pins_request_parameters() {
        let config = ClientConfig::new("sk-test");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, MAX_OUTPUT_TOKENS);
        assert_eq!(config.temperature, SAMPLING_TEMPERATURE);
    }

    #[test]
    fn test_load_secret_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"anthropic": {{"api_key": "sk-from-file"}}}}"#).unwrap();

        assert_eq!(
            load_secret_file(file.path()),
            Some("sk-from-file".to_string())
        );
    }

    #[test]
    fn test_missing_or_malformed_secret_file() {
        assert_eq!(load_secret_file(Path::new("/nonexistent/secret.json")), None);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert_eq!(load_secret_file(file.path()), None);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"other": true}}"#).unwrap();
        assert_eq!(load_secret_file(file.path()), None);
    }
}
