//! Path resolution for frontline configuration and data files.
//!
//! All frontline data is stored in `~/.frontline/` unless `FRONTLINE_HOME`
//! points somewhere else:
//! - `config.yaml` - Main configuration file
//! - `frontline.db` - SQLite key-value store (queue, caches, session)

use std::path::PathBuf;

use crate::error::FrontlineError;

/// Environment variable that overrides the data root.
pub const HOME_ENV: &str = "FRONTLINE_HOME";

/// Paths to frontline configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.frontline/`
    pub root: PathBuf,
    /// Config file: `~/.frontline/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.frontline/frontline.db`
    pub database: PathBuf,
}

impl Paths {
    /// Resolve paths from `FRONTLINE_HOME`, falling back to `$HOME/.frontline`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither variable is set.
    pub fn new() -> Result<Self, FrontlineError> {
        if let Ok(root) = std::env::var(HOME_ENV) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME").map_err(|_| {
            FrontlineError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".frontline")))
    }

    /// Create paths with a custom root directory.
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("frontline.db"),
            root,
        }
    }

    /// Ensure the root directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), FrontlineError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                FrontlineError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }

        Ok(())
    }
}
