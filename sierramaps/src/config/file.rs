//! The `ConfigFile` model and its INI persistence.

use std::fs;
use std::path::{Path, PathBuf};

use ini::Ini;
use tracing::debug;

use super::keys::ConfigKey;
use super::{config_dir, config_file_path, ConfigError};
use crate::executor::default_workers;
use crate::provider::DEFAULT_TIMEOUT_SECS;
use crate::tile::TileUrlTemplate;

/// `[cache]` section.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Host cache directory; tiles go in its `tiles/` subdirectory.
    pub directory: PathBuf,
}

/// `[tiles]` section.
#[derive(Debug, Clone)]
pub struct TileSettings {
    pub url_template: TileUrlTemplate,
}

/// `[http]` section.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout_secs: u64,
}

/// `[executor]` section.
#[derive(Debug, Clone)]
pub struct ExecutorSettings {
    /// Concurrent tile resolutions for background work.
    pub workers: usize,
}

/// `[logging]` section.
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub directory: PathBuf,
}

/// All user settings.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub cache: CacheSettings,
    pub tiles: TileSettings,
    pub http: HttpSettings,
    pub executor: ExecutorSettings,
    pub logging: LoggingSettings,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let cache_dir = dirs::cache_dir()
            .map(|d| d.join("sierramaps"))
            .unwrap_or_else(|| config_dir().join("cache"));

        Self {
            cache: CacheSettings {
                directory: cache_dir,
            },
            tiles: TileSettings {
                url_template: TileUrlTemplate::default(),
            },
            http: HttpSettings {
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            executor: ExecutorSettings {
                workers: default_workers(),
            },
            logging: LoggingSettings {
                directory: config_dir().join("logs"),
            },
        }
    }
}

impl ConfigFile {
    /// Load from the default location, or defaults if the file is absent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`, or defaults if the file is absent.
    ///
    /// Unknown sections and keys are ignored. Known keys with invalid
    /// values are an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(config);
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        for key in ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                key.set(&mut config, value)?;
            }
        }

        debug!(path = %path.display(), "Config loaded");
        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save every setting to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini.write_to_file(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConfigFile::default();
        assert_eq!(config.http.timeout_secs, 30);
        assert!(config.executor.workers >= 1);
        assert_eq!(
            config.tiles.url_template.as_str(),
            "https://sierramapstiles.onrender.com/tiles/{x}/{y}/{z}"
        );
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = ConfigFile::load_from(&temp_dir.path().join("config.ini")).unwrap();
        assert_eq!(config.http.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_load_partial_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.ini");
        fs::write(
            &path,
            "[cache]\ndirectory = /tmp/tiles-here\n\n[http]\ntimeout_secs = 5\n\n[other]\nx = y\n",
        )
        .unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.cache.directory, PathBuf::from("/tmp/tiles-here"));
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(
            config.tiles.url_template.as_str(),
            TileUrlTemplate::default().as_str()
        );
    }

    #[test]
    fn test_load_invalid_value() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.ini");
        fs::write(&path, "[executor]\nworkers = many\n").unwrap();

        let err = ConfigFile::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.http.timeout_secs = 12;
        config.executor.workers = 3;
        config.tiles.url_template = TileUrlTemplate::new("http://localhost/{z}/{x}/{y}").unwrap();
        config.save_to(&path).unwrap();

        let reloaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(reloaded.http.timeout_secs, 12);
        assert_eq!(reloaded.executor.workers, 3);
        assert_eq!(
            reloaded.tiles.url_template.as_str(),
            "http://localhost/{z}/{x}/{y}"
        );
        assert_eq!(reloaded.cache.directory, config.cache.directory);
    }
}
