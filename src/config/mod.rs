//! User configuration stored as `<home>/config.json`.

use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::core::utils::{replace_file, PathResolver};

pub const API_KEY_ENV: &str = "SMARTSPEND_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config file is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("unknown config key `{0}`")]
    UnknownKey(String),
    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue { key: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub currency: String,
    pub locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "USD".into(),
            locale: "en-US".into(),
            data_dir: None,
            assistant: AssistantConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub enabled: bool,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: DEFAULT_MODEL.into(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AssistantConfig {
    /// API key from `SMARTSPEND_API_KEY`, falling back to the stored key.
    pub fn effective_api_key(&self) -> Option<String> {
        env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|key| !key.trim().is_empty()))
    }
}

impl Config {
    pub const KEYS: [&'static str; 7] = [
        "currency",
        "locale",
        "data_dir",
        "assistant.enabled",
        "assistant.model",
        "assistant.api_key",
        "assistant.timeout_secs",
    ];

    /// Updates one setting from its dotted key. An empty value clears optional settings.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "currency" => self.currency = required(key, value)?.to_uppercase(),
            "locale" => self.locale = required(key, value)?.to_string(),
            "data_dir" => self.data_dir = optional(value).map(PathBuf::from),
            "assistant.enabled" => {
                self.assistant.enabled = match value.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    _ => return Err(invalid(key, "expected true or false")),
                }
            }
            "assistant.model" => self.assistant.model = required(key, value)?.to_string(),
            "assistant.api_key" => self.assistant.api_key = optional(value).map(str::to_string),
            "assistant.timeout_secs" => {
                let secs: u64 = value
                    .parse()
                    .map_err(|_| invalid(key, "expected a whole number of seconds"))?;
                if secs == 0 {
                    return Err(invalid(key, "must be at least 1"));
                }
                self.assistant.timeout_secs = secs;
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Settings as `(key, value)` pairs for display, with the API key masked.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("currency", self.currency.clone()),
            ("locale", self.locale.clone()),
            (
                "data_dir",
                self.data_dir
                    .as_ref()
                    .map(|dir| dir.display().to_string())
                    .unwrap_or_else(|| "(default)".into()),
            ),
            ("assistant.enabled", self.assistant.enabled.to_string()),
            ("assistant.model", self.assistant.model.clone()),
            (
                "assistant.api_key",
                match self.assistant.effective_api_key() {
                    Some(_) => "(set)".into(),
                    None => "(not set)".into(),
                },
            ),
            (
                "assistant.timeout_secs",
                self.assistant.timeout_secs.to_string(),
            ),
        ]
    }
}

fn required<'a>(key: &str, value: &'a str) -> Result<&'a str, ConfigError> {
    if value.is_empty() {
        Err(invalid(key, "must not be empty"))
    } else {
        Ok(value)
    }
}

fn optional(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    /// Reads the config file, or returns defaults when it does not exist yet.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)?;
        replace_file(&self.path, &json)?;
        tracing::debug!(path = %self.path.display(), "saved configuration");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.assistant.model, DEFAULT_MODEL);
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        config.set_value("currency", "eur").unwrap();
        config.set_value("assistant.timeout_secs", "5").unwrap();
        manager.save(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded.currency, "EUR");
        assert_eq!(loaded.assistant.timeout_secs, 5);
    }

    #[test]
    fn partial_assistant_section_fills_defaults() {
        let json = r#"{"currency":"USD","locale":"en-US","assistant":{"enabled":false}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(!config.assistant.enabled);
        assert_eq!(config.assistant.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn set_value_rejects_unknown_and_malformed() {
        let mut config = Config::default();
        assert!(matches!(
            config.set_value("theme", "dark"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            config.set_value("assistant.enabled", "maybe"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(config.set_value("assistant.timeout_secs", "0").is_err());
        assert!(config.set_value("locale", "").is_err());
    }

    #[test]
    fn empty_value_clears_optional_settings() {
        let mut config = Config::default();
        config.set_value("data_dir", "/tmp/ss").unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/ss")));
        config.set_value("data_dir", "").unwrap();
        assert_eq!(config.data_dir, None);
    }
}
