//! Bot configuration.
//!
//! Loading follows fall-back-to-default semantics: a missing or corrupt
//! file yields the defaults rather than an error, so a bot can always
//! start.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable naming the bot.
const ENV_NAME: &str = "FLOWBOT_NAME";
/// Environment variable toggling offline (REPL) mode.
const ENV_OFFLINE: &str = "FLOWBOT_OFFLINE";

/// Runtime configuration for a bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Display name override; the transport announcement's name is used
    /// when unset.
    pub name: Option<String>,
    /// Run against the offline REPL instead of a live transport.
    pub offline: bool,
    /// Gate intake on the announced identity: mentions and direct
    /// conversations only. Disable to process every message the
    /// transport delivers.
    pub intake_gating: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: None,
            offline: false,
            intake_gating: true,
        }
    }
}

impl BotConfig {
    /// Load from a JSON file, falling back to the defaults if the file
    /// is missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "Ignoring corrupt config file"
                );
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save as pretty-printed JSON.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Read overrides from the environment, after a best-effort `.env`
    /// load.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();
        if let Ok(name) = std::env::var(ENV_NAME) {
            config.name = Some(name);
        }
        if let Ok(raw) = std::env::var(ENV_OFFLINE) {
            config.offline = parse_bool(ENV_OFFLINE, &raw)?;
        }
        Ok(config)
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got {raw:?}"),
        }),
    }
}
