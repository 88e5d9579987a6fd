//! Configuration file handling.
//!
//! Settings live in an INI file at `~/.sierramaps/config.ini`:
//!
//! ```ini
//! [cache]
//! directory = /home/user/.cache/sierramaps
//!
//! [tiles]
//! url_template = https://sierramapstiles.onrender.com/tiles/{x}/{y}/{z}
//!
//! [http]
//! timeout_secs = 30
//!
//! [executor]
//! workers = 16
//!
//! [logging]
//! directory = /home/user/.sierramaps/logs
//! ```
//!
//! A missing file, section or key falls back to its default.

mod file;
mod keys;

use std::path::PathBuf;

use thiserror::Error;

pub use file::{
    CacheSettings, ConfigFile, ExecutorSettings, HttpSettings, LoggingSettings, TileSettings,
};
pub use keys::ConfigKey;

/// Name of the per-user configuration directory under `$HOME`.
pub const CONFIG_DIR_NAME: &str = ".sierramaps";

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Errors reading, writing or editing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure reading or writing the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid INI.
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// A value could not be converted to its setting's type.
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// Key is not a known `section.key`.
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// The per-user configuration directory (`~/.sierramaps`).
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Full path of the configuration file.
pub fn config_file_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// Format a byte count for humans (`1.5 MB`).
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}
