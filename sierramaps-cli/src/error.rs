//! CLI error type.

use thiserror::Error;

use sierramaps::config::ConfigError;
use sierramaps::interceptor::TileUnavailable;
use sierramaps::logging::LoggingError;
use sierramaps::provider::ProviderError;

/// Errors surfaced to the user by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    #[error("Failed to initialize logging: {0}")]
    Logging(#[from] LoggingError),

    #[error("Failed to create HTTP client: {0}")]
    Http(#[from] ProviderError),

    #[error("{0}")]
    Tile(#[from] TileUnavailable),

    #[error("Failed to clear cache: {0}")]
    CacheClear(String),

    #[error("Failed to read cache statistics: {0}")]
    CacheStats(String),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Failed to start runtime: {0}")]
    Runtime(String),

    #[error("Prefetch finished with {0} failed tiles")]
    PrefetchFailures(usize),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::ConfigFile(_) => 2,
            _ => 1,
        }
    }
}
