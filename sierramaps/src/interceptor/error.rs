//! The interceptor's single failure type.

use std::fmt;

use thiserror::Error;

/// Where resolution failed. Informational only: every stage means the same
/// thing to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The request URL was empty.
    EmptyUrl,
    /// The cache directory could not be created.
    CreateDir,
    /// The cache file exists but could not be read.
    Read,
    /// The network fetch failed or returned a non-success status.
    Fetch,
    /// The fetched tile could not be written to the cache.
    Write,
    /// The resolution task was cancelled or never ran.
    Cancelled,
    /// The resolution task panicked.
    Panicked,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::EmptyUrl => "empty url",
            Stage::CreateDir => "create cache dir",
            Stage::Read => "read cache",
            Stage::Fetch => "fetch",
            Stage::Write => "write cache",
            Stage::Cancelled => "cancelled",
            Stage::Panicked => "panicked",
        };
        f.write_str(name)
    }
}

/// No content is available for a tile.
///
/// Callers degrade gracefully (render no tile) regardless of the stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Tile unavailable at {stage} for {url}: {reason}")]
pub struct TileUnavailable {
    pub url: String,
    pub stage: Stage,
    pub reason: String,
}

impl TileUnavailable {
    pub(crate) fn new(url: &str, stage: Stage, reason: impl ToString) -> Self {
        Self {
            url: url.to_string(),
            stage,
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = TileUnavailable::new("http://h/tiles/1/2/3", Stage::Fetch, "HTTP 500");
        assert_eq!(
            err.to_string(),
            "Tile unavailable at fetch for http://h/tiles/1/2/3: HTTP 500"
        );
    }

    #[test]
    fn test_from_io_reason() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = TileUnavailable::new("u", Stage::Write, io_err);
        assert_eq!(err.stage, Stage::Write);
        assert!(err.reason.contains("denied"));
    }
}
