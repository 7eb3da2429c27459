//! Configuration management for recordbook.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "recordbook";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "records.db";

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `RECORDBOOK_`, sections split on `__`)
/// 2. TOML config file at `~/.config/recordbook/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on, e.g. `127.0.0.1:8080`.
    pub bind: String,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/recordbook/records.db`
    pub database_path: Option<PathBuf>,
    /// How long a connection waits on a locked database, in milliseconds.
    pub busy_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            busy_timeout_ms: 5_000,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("RECORDBOOK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Check one configuration file, environment overrides included.
    ///
    /// Unlike [`Config::load_from`], a missing file is an error here.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, fails to parse, or holds
    /// invalid values.
    pub fn validate_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigValidation {
                message: format!("configuration file not found: {}", path.display()),
            });
        }
        Self::load_from(Some(path.to_path_buf()))
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
        if self.server.bind.parse::<SocketAddr>().is_err() {
            return Err(Error::ConfigValidation {
                message: format!("invalid bind address: {}", self.server.bind),
            });
        }

        if self.storage.busy_timeout_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "busy_timeout_ms must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the listen address.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|_| Error::ConfigValidation {
                message: format!("invalid bind address: {}", self.server.bind),
            })
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the busy timeout as a Duration.
    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.storage.busy_timeout_ms)
    }
}
