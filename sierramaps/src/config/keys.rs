//! Typed `section.key` names for reading and editing settings.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFile;
use super::ConfigError;
use crate::tile::TileUrlTemplate;

/// A known configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    CacheDirectory,
    TilesUrlTemplate,
    HttpTimeoutSecs,
    ExecutorWorkers,
    LoggingDirectory,
}

impl ConfigKey {
    /// Every key, in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::CacheDirectory,
            ConfigKey::TilesUrlTemplate,
            ConfigKey::HttpTimeoutSecs,
            ConfigKey::ExecutorWorkers,
            ConfigKey::LoggingDirectory,
        ]
    }

    /// INI section name.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::CacheDirectory => "cache",
            ConfigKey::TilesUrlTemplate => "tiles",
            ConfigKey::HttpTimeoutSecs => "http",
            ConfigKey::ExecutorWorkers => "executor",
            ConfigKey::LoggingDirectory => "logging",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::CacheDirectory => "directory",
            ConfigKey::TilesUrlTemplate => "url_template",
            ConfigKey::HttpTimeoutSecs => "timeout_secs",
            ConfigKey::ExecutorWorkers => "workers",
            ConfigKey::LoggingDirectory => "directory",
        }
    }

    /// Dotted name, e.g. `http.timeout_secs`.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value rendered as a string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::CacheDirectory => config.cache.directory.display().to_string(),
            ConfigKey::TilesUrlTemplate => config.tiles.url_template.to_string(),
            ConfigKey::HttpTimeoutSecs => config.http.timeout_secs.to_string(),
            ConfigKey::ExecutorWorkers => config.executor.workers.to_string(),
            ConfigKey::LoggingDirectory => config.logging.directory.display().to_string(),
        }
    }

    /// Parse `value` and store it in `config`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |reason: String| ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason,
        };

        match self {
            ConfigKey::CacheDirectory => {
                if value.is_empty() {
                    return Err(invalid("path must not be empty".to_string()));
                }
                config.cache.directory = PathBuf::from(value);
            }
            ConfigKey::TilesUrlTemplate => {
                config.tiles.url_template =
                    TileUrlTemplate::new(value).map_err(|e| invalid(e.to_string()))?;
            }
            ConfigKey::HttpTimeoutSecs => {
                let secs: u64 = value.parse().map_err(|_| invalid("not a number".to_string()))?;
                if secs == 0 {
                    return Err(invalid("must be at least 1".to_string()));
                }
                config.http.timeout_secs = secs;
            }
            ConfigKey::ExecutorWorkers => {
                let workers: usize =
                    value.parse().map_err(|_| invalid("not a number".to_string()))?;
                if workers == 0 {
                    return Err(invalid("must be at least 1".to_string()));
                }
                config.executor.workers = workers;
            }
            ConfigKey::LoggingDirectory => {
                if value.is_empty() {
                    return Err(invalid("path must not be empty".to_string()));
                }
                config.logging.directory = PathBuf::from(value);
            }
        }
        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == s.trim().to_lowercase())
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
