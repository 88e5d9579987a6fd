//! Shared setup for commands that touch tiles.
//!
//! Loads the configuration, installs logging and builds the interceptor
//! against the configured cache directory and tile server.

use std::path::PathBuf;
use std::sync::Arc;

use sierramaps::config::ConfigFile;
use sierramaps::interceptor::TileInterceptor;
use sierramaps::logging::{init_logging, WorkerGuard};
use sierramaps::provider::ReqwestClient;
use tracing::info;

use crate::error::CliError;

/// Command runner holding configuration and the live interceptor.
pub struct CliRunner {
    config: ConfigFile,
    interceptor: Arc<TileInterceptor<ReqwestClient>>,
    _log_guard: WorkerGuard,
}

impl CliRunner {
    /// Load config, start logging, build the HTTP client and interceptor.
    ///
    /// `cache_dir` overrides `cache.directory` from the config file.
    pub fn new(cache_dir: Option<PathBuf>, verbose: bool) -> Result<Self, CliError> {
        let mut config = ConfigFile::load()?;
        if let Some(dir) = cache_dir {
            config.cache.directory = dir;
        }

        let log_guard = init_logging(&config.logging.directory, verbose)?;
        let client = ReqwestClient::with_timeout(config.http.timeout_secs)?;
        let interceptor = Arc::new(TileInterceptor::new(&config.cache.directory, client));

        Ok(Self {
            config,
            interceptor,
            _log_guard: log_guard,
        })
    }

    /// The effective configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// The shared interceptor.
    pub fn interceptor(&self) -> &Arc<TileInterceptor<ReqwestClient>> {
        &self.interceptor
    }

    /// Log the effective settings for a command.
    pub fn log_startup(&self, command: &str) {
        info!(
            command,
            version = env!("CARGO_PKG_VERSION"),
            cache_dir = %self.interceptor.store().dir().display(),
            tile_server = %self.config.tiles.url_template,
            timeout_secs = self.config.http.timeout_secs,
            "SierraMaps starting"
        );
    }
}
