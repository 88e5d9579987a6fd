//! Logging setup.
//!
//! Installs a `tracing` subscriber with two outputs:
//! - stderr, human-readable, local timestamps
//! - `{log_dir}/sierramaps.log`, same format without ANSI colors, written
//!   on a background thread
//!
//! `RUST_LOG` overrides the default filter.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::UtcOffset;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub use tracing_appender::non_blocking::WorkerGuard;

/// Name of the log file inside the log directory.
pub const LOG_FILE_NAME: &str = "sierramaps.log";

/// Errors installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory: {0}")]
    CreateDir(#[from] io::Error),

    #[error("Failed to open log file: {0}")]
    Appender(String),

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Default filter directive when `RUST_LOG` is unset.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "sierramaps=debug,sierramaps_cli=debug"
    } else {
        "sierramaps=info,sierramaps_cli=info"
    }
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and stops the file writer.
pub fn init_logging(log_dir: &Path, verbose: bool) -> Result<WorkerGuard, LoggingError> {
    fs::create_dir_all(log_dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(log_dir)
        .map_err(|e| LoggingError::Appender(e.to_string()))?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let timer = OffsetTime::new(offset, Rfc3339);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_timer(timer.clone()),
        )
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_timer(timer),
        )
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    Ok(guard)
}
