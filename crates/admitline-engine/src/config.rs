//! Configuration types for admitline.
//!
//! Configuration lives in `.admitline/config.json`. Every field has a default,
//! so a missing or partial file still yields a usable configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::status::{Locale, DEFAULT_URGENT_DAYS};
use crate::window::DEFAULT_HALF_SPAN_DAYS;

/// Directory holding configuration and the default data file.
pub const ADMITLINE_DIR: &str = ".admitline";

/// Main configuration for admitline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Timeline data file.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Days shown either side of an event after navigating to it.
    #[serde(default = "default_half_span_days")]
    pub half_span_days: i64,

    /// Milestones this many days away or closer are highlighted.
    #[serde(default = "default_urgent_days")]
    pub urgent_days: i64,

    /// Display language.
    #[serde(default)]
    pub locale: Locale,

    /// Seconds between automatic reloads in the TUI (0 disables).
    #[serde(default = "default_reload_interval_secs")]
    pub reload_interval_secs: u64,

    /// TUI tick rate in milliseconds.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_data_file() -> PathBuf {
    Path::new(ADMITLINE_DIR).join("timeline.json")
}

fn default_half_span_days() -> i64 {
    DEFAULT_HALF_SPAN_DAYS
}

fn default_urgent_days() -> i64 {
    DEFAULT_URGENT_DAYS
}

fn default_reload_interval_secs() -> u64 {
    300
}

fn default_tick_rate_ms() -> u64 {
    250
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            half_span_days: default_half_span_days(),
            urgent_days: default_urgent_days(),
            locale: Locale::default(),
            reload_interval_secs: default_reload_interval_secs(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl Config {
    /// Default location of the configuration file.
    pub fn default_path() -> PathBuf {
        Path::new(ADMITLINE_DIR).join("config.json")
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: Self = serde_json::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Reject values that would produce a degenerate window or a stalled tick.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.half_span_days < 1 {
            return Err(ConfigError::Invalid(format!(
                "half_span_days must be at least 1 (got {})",
                self.half_span_days
            )));
        }
        if self.urgent_days < 0 {
            return Err(ConfigError::Invalid(format!(
                "urgent_days must not be negative (got {})",
                self.urgent_days
            )));
        }
        if self.tick_rate_ms < 1 {
            return Err(ConfigError::Invalid(format!(
                "tick_rate_ms must be at least 1 (got {})",
                self.tick_rate_ms
            )));
        }
        Ok(())
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A value is out of range.
    #[error("Invalid config: {0}")]
    Invalid(String),
}
