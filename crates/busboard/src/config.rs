//! Configuration management for busboard.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "busboard";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "board.db";

/// Default legacy data directory name (under the data directory).
const LEGACY_DIR_NAME: &str = "legacy";

/// How many day logs the store retains before evicting the oldest.
pub const DEFAULT_MAX_DAY_LOGS: usize = 30;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `BUSBOARD_`, sections separated
///    by a double underscore, e.g. `BUSBOARD_STORAGE__MAX_DAY_LOGS`)
/// 2. TOML config file at `~/.config/busboard/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/busboard/board.db`
    pub database_path: Option<PathBuf>,
    /// Directory holding per-key JSON files written by the previous
    /// application version, imported once on startup.
    /// Defaults to `~/.local/share/busboard/legacy`
    pub legacy_dir: Option<PathBuf>,
    /// Maximum number of day logs to retain; the oldest is evicted first.
    pub max_day_logs: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            legacy_dir: None,
            max_day_logs: DEFAULT_MAX_DAY_LOGS,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            // Double-underscore section separator, so snake_case keys like
            // BUSBOARD_STORAGE__MAX_DAY_LOGS stay addressable
            .merge(Env::prefixed("BUSBOARD_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.max_day_logs == 0 {
            return Err(Error::config_validation(
                "max_day_logs must be at least 1",
            ));
        }
        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the legacy data directory, resolving defaults if not set.
    #[must_use]
    pub fn legacy_dir(&self) -> PathBuf {
        self.storage
            .legacy_dir
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(LEGACY_DIR_NAME))
    }
}
