//! Configuration settings for frontline.
//!
//! Settings are loaded from `~/.frontline/config.yaml`. Every field has a
//! default, so a partial (or missing) file is fine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::error::FrontlineError;
use crate::storage::DEFAULT_PREFIX;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Local storage settings.
    pub storage: StorageConfig,
    /// Queue drain timing.
    pub sync: SyncConfig,
    /// Remote backend proxy.
    pub backend: BackendConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

/// Local storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Namespace prefix for every application key.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Keep everything in memory (nothing survives the process).
    #[serde(default)]
    pub in_memory: bool,
}

/// Queue drain timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Delay between a reconnect signal and the drain it triggers.
    #[serde(default = "default_reconnect_debounce_ms")]
    pub reconnect_debounce_ms: u64,
    /// How often the pending count is refreshed for display.
    #[serde(default = "default_pending_poll_interval_ms")]
    pub pending_poll_interval_ms: u64,
}

/// Remote backend proxy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend API. Without one, drains cannot run.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

fn default_log_filter() -> String {
    "warn".to_string()
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

const fn default_reconnect_debounce_ms() -> u64 {
    1000
}

const fn default_pending_poll_interval_ms() -> u64 {
    2000
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            log_filter: default_log_filter(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            in_memory: false,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            reconnect_debounce_ms: default_reconnect_debounce_ms(),
            pending_poll_interval_ms: default_pending_poll_interval_ms(),
        }
    }
}

impl SyncConfig {
    #[must_use]
    pub const fn reconnect_debounce(&self) -> Duration {
        Duration::from_millis(self.reconnect_debounce_ms)
    }

    /// Never zero; a zero setting polls every millisecond.
    #[must_use]
    pub const fn pending_poll_interval(&self) -> Duration {
        if self.pending_poll_interval_ms == 0 {
            Duration::from_millis(1)
        } else {
            Duration::from_millis(self.pending_poll_interval_ms)
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, FrontlineError> {
        let paths = Paths::new()?;
        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, FrontlineError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            FrontlineError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            FrontlineError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), FrontlineError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| FrontlineError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            FrontlineError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }
}
