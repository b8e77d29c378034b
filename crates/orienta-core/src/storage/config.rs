//! TOML-based application configuration.
//!
//! Stores:
//! - API endpoint and user identity
//! - Quiz behavior (auto-advance, resubmission guard)
//!
//! Configuration is stored at `~/.config/orienta/config.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;

/// API endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Identity sent with submissions.
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

/// Quiz behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    #[serde(default = "default_true")]
    pub auto_advance: bool,
    /// Delay before the view moves on after an answer, in milliseconds.
    #[serde(default = "default_auto_advance_delay_ms")]
    pub auto_advance_delay_ms: u64,
    /// Window during which a second submission for the same test is
    /// suppressed, in seconds.
    #[serde(default = "default_resubmit_guard_secs")]
    pub resubmit_guard_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/orienta/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub quiz: QuizConfig,
}

fn default_base_url() -> String {
    "http://localhost:4000/api".into()
}
fn default_user_id() -> String {
    "local".into()
}
fn default_true() -> bool {
    true
}
fn default_auto_advance_delay_ms() -> u64 {
    350
}
fn default_resubmit_guard_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_id: default_user_id(),
        }
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            auto_advance: true,
            auto_advance_delay_ms: default_auto_advance_delay_ms(),
            resubmit_guard_secs: default_resubmit_guard_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            quiz: QuizConfig::default(),
        }
    }
}

impl Config {
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing defaults on first run.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let value = key.split('.').try_fold(&json, |node, part| node.get(part))?;
        match value {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and persist. The value is
    /// parsed against the existing field's type; unknown keys are rejected.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.save()
    }
}

fn set_json_value_by_path(
    root: &mut serde_json::Value,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    let unknown = || ConfigError::InvalidValue {
        key: key.to_string(),
        message: "unknown config key".into(),
    };
    let mut parts = key.split('.').peekable();
    if parts.peek().is_none() {
        return Err(unknown());
    }

    let mut current = root;
    while let Some(part) = parts.next() {
        let is_leaf = parts.peek().is_none();
        let obj = current.as_object_mut().ok_or_else(unknown)?;
        if is_leaf {
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(value.parse().map_err(
                    |_| ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: format!("cannot parse '{value}' as bool"),
                    },
                )?),
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(serde_json::Value::from)
                    .or_else(|_| value.parse::<f64>().map(serde_json::Value::from))
                    .map_err(|_| ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: format!("cannot parse '{value}' as number"),
                    })?,
                serde_json::Value::String(_) => serde_json::Value::String(value.to_string()),
                _ => return Err(unknown()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }
        current = obj.get_mut(part).ok_or_else(unknown)?;
    }
    Err(unknown())
}
