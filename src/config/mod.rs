//! Configuration management for frontline.
//!
//! This module handles loading configuration from `~/.frontline/`.

mod paths;
mod settings;

pub use paths::{Paths, HOME_ENV};
pub use settings::{BackendConfig, Config, GeneralConfig, StorageConfig, SyncConfig};
