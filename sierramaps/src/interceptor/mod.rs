//! Tile cache interceptor.
//!
//! Sits in front of a renderer's tile requests and answers them from the
//! offline cache, falling back to a single blocking network fetch on a miss.
//!
//! ```text
//! url ──► sanitize ──► lock(key) ──► file exists? ──yes──► read ──► bytes
//!                                         │
//!                                         no
//!                                         ▼
//!                                   HTTP GET ──► write file ──► bytes
//! ```
//!
//! Any failure along the way surfaces as [`TileUnavailable`]; the host
//! then lets the renderer handle the miss.
//!
//! Concurrent requests for the same URL are serialized on a per-key lock,
//! so a tile is fetched at most once even when several renderer threads
//! ask for it at the same moment. Different URLs never contend.

mod error;
mod response;

use std::path::Path;

use tracing::{debug, warn};

use crate::cache::{sanitize, DiskTileStore, KeyedLocks};
use crate::provider::HttpClient;

pub use error::{Stage, TileUnavailable};
pub use response::{TileResponse, TILE_ENCODING, TILE_MIME_TYPE};

/// Resolves tile URLs against the disk cache and the network.
pub struct TileInterceptor<C> {
    store: DiskTileStore,
    client: C,
    locks: KeyedLocks,
}

impl<C: HttpClient> TileInterceptor<C> {
    /// Create an interceptor caching under `{cache_root}/tiles/`.
    ///
    /// # Arguments
    ///
    /// * `cache_root` - The host's cache directory
    /// * `client` - HTTP client used on cache misses
    pub fn new(cache_root: impl AsRef<Path>, client: C) -> Self {
        Self::with_store(DiskTileStore::new(cache_root), client)
    }

    /// Create an interceptor over an existing store.
    pub fn with_store(store: DiskTileStore, client: C) -> Self {
        Self {
            store,
            client,
            locks: KeyedLocks::new(),
        }
    }

    /// The underlying disk store.
    pub fn store(&self) -> &DiskTileStore {
        &self.store
    }

    /// Return the bytes for `url`, from cache if present, else from the network.
    ///
    /// On a miss the response body is written to the cache file before it is
    /// returned. A non-success HTTP status writes nothing.
    ///
    /// # Errors
    ///
    /// [`TileUnavailable`] if the URL is empty, or if creating the cache
    /// directory, reading the cache file, fetching, or writing fails.
    pub fn resolve(&self, url: &str) -> Result<Vec<u8>, TileUnavailable> {
        if url.is_empty() {
            return Err(TileUnavailable::new(url, Stage::EmptyUrl, "no url given"));
        }

        let key = sanitize(url);
        self.store
            .ensure_dir()
            .map_err(|e| TileUnavailable::new(url, Stage::CreateDir, e))?;

        let _guard = self.locks.lock(&key);

        if let Some(data) = self
            .store
            .read(&key)
            .map_err(|e| TileUnavailable::new(url, Stage::Read, e))?
        {
            debug!(url, bytes = data.len(), "Tile cache hit");
            return Ok(data);
        }

        debug!(url, "Tile cache miss, fetching");
        let data = self
            .client
            .get(url)
            .map_err(|e| TileUnavailable::new(url, Stage::Fetch, e))?;

        self.store
            .write(&key, &data)
            .map_err(|e| TileUnavailable::new(url, Stage::Write, e))?;

        Ok(data)
    }

    /// Host-facing form of [`resolve`](Self::resolve).
    ///
    /// Returns `None` when no content is available so the caller can fall
    /// back to the renderer's default handling.
    pub fn intercept(&self, url: &str) -> Option<TileResponse> {
        match self.resolve(url) {
            Ok(data) => Some(TileResponse::png(data)),
            Err(e) => {
                warn!(url = %e.url, stage = %e.stage, reason = %e.reason, "Tile unavailable");
                None
            }
        }
    }

    /// Whether a cache file already exists for `url`.
    pub fn is_cached(&self, url: &str) -> bool {
        !url.is_empty() && self.store.contains(&sanitize(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MockHttpClient, ProviderError};
    use std::fs;
    use std::sync::Arc;

    const URL: &str = "https://sierramapstiles.onrender.com/tiles/1/2/3";

    #[test]
    fn test_hit_returns_file_without_fetch() {
        let temp_dir = tempfile::tempdir().unwrap();
        let interceptor =
            TileInterceptor::new(temp_dir.path(), MockHttpClient::ok(vec![0xAA]));

        interceptor.store().write(&sanitize(URL), b"cached").unwrap();

        assert_eq!(interceptor.resolve(URL).unwrap(), b"cached".to_vec());
        assert_eq!(interceptor.client.call_count(), 0);
    }

    #[test]
    fn test_miss_fetches_once_and_persists() {
        let temp_dir = tempfile::tempdir().unwrap();
        let body = vec![0x89, b'P', b'N', b'G', 0, 1, 2];
        let interceptor = TileInterceptor::new(temp_dir.path(), MockHttpClient::ok(body.clone()));

        assert!(!interceptor.is_cached(URL));
        assert_eq!(interceptor.resolve(URL).unwrap(), body);
        assert_eq!(interceptor.client.call_count(), 1);

        let on_disk = fs::read(interceptor.store().path_for(&sanitize(URL))).unwrap();
        assert_eq!(on_disk, body);
        assert!(interceptor.is_cached(URL));
    }

    #[test]
    fn test_miss_then_hit_is_identical() {
        let temp_dir = tempfile::tempdir().unwrap();
        let interceptor = TileInterceptor::new(temp_dir.path(), MockHttpClient::ok(vec![7; 64]));

        let first = interceptor.resolve(URL).unwrap();
        let second = interceptor.resolve(URL).unwrap();

        assert_eq!(first, second);
        assert_eq!(interceptor.client.call_count(), 1);
    }

    #[test]
    fn test_fetch_failure_writes_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let interceptor =
            TileInterceptor::new(temp_dir.path(), MockHttpClient::failing("connection refused"));

        let err = interceptor.resolve(URL).unwrap_err();
        assert_eq!(err.stage, Stage::Fetch);
        assert_eq!(err.url, URL);
        assert!(!interceptor.is_cached(URL));
        assert_eq!(interceptor.store().stats().unwrap(), (0, 0));
    }

    #[test]
    fn test_status_failure_writes_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let client = MockHttpClient {
            response: Err(ProviderError::Status {
                status: 404,
                url: URL.to_string(),
            }),
            calls: Default::default(),
        };
        let interceptor = TileInterceptor::new(temp_dir.path(), client);

        assert!(interceptor.resolve(URL).is_err());
        assert!(!interceptor.is_cached(URL));
    }

    #[test]
    fn test_empty_url_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let interceptor = TileInterceptor::new(temp_dir.path(), MockHttpClient::ok(vec![1]));

        let err = interceptor.resolve("").unwrap_err();
        assert_eq!(err.stage, Stage::EmptyUrl);
        assert_eq!(interceptor.client.call_count(), 0);
        assert!(!interceptor.store().dir().exists());
    }

    #[test]
    fn test_resolve_creates_cache_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("nested").join("cache");
        let interceptor = TileInterceptor::new(&root, MockHttpClient::failing("offline"));

        let _ = interceptor.resolve(URL);
        assert!(root.join("tiles").is_dir());
    }

    #[test]
    fn test_uncreatable_cache_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let blocker = temp_dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();

        let interceptor = TileInterceptor::new(&blocker, MockHttpClient::ok(vec![1]));
        let err = interceptor.resolve(URL).unwrap_err();
        assert_eq!(err.stage, Stage::CreateDir);
        assert_eq!(interceptor.client.call_count(), 0);
    }

    #[test]
    fn test_unreadable_entry_is_read_failure() {
        let temp_dir = tempfile::tempdir().unwrap();
        let interceptor = TileInterceptor::new(temp_dir.path(), MockHttpClient::ok(vec![1]));

        // A directory where the tile file should be fails with EISDIR.
        fs::create_dir_all(interceptor.store().path_for(&sanitize(URL))).unwrap();

        let err = interceptor.resolve(URL).unwrap_err();
        assert_eq!(err.stage, Stage::Read);
        assert_eq!(interceptor.client.call_count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_failure_returns_no_bytes() {
        let temp_dir = tempfile::tempdir().unwrap();
        let interceptor = TileInterceptor::new(temp_dir.path(), MockHttpClient::ok(vec![3; 16]));
        interceptor.store().ensure_dir().unwrap();

        // Dangling link: reads as a miss, and the write cannot create its target.
        let target = temp_dir.path().join("missing").join("tile");
        std::os::unix::fs::symlink(&target, interceptor.store().path_for(&sanitize(URL))).unwrap();

        let err = interceptor.resolve(URL).unwrap_err();
        assert_eq!(err.stage, Stage::Write);
        assert_eq!(err.url, URL);
        assert_eq!(interceptor.client.call_count(), 1);
        assert!(!interceptor.is_cached(URL));
        assert!(interceptor.intercept(URL).is_none());
    }

    #[test]
    fn test_intercept_wraps_png() {
        let temp_dir = tempfile::tempdir().unwrap();
        let interceptor = TileInterceptor::new(temp_dir.path(), MockHttpClient::ok(vec![1, 2]));

        let response = interceptor.intercept(URL).unwrap();
        assert_eq!(response.mime_type, "image/png");
        assert_eq!(response.encoding, "UTF-8");
        assert_eq!(response.data, vec![1, 2]);
    }

    #[test]
    fn test_intercept_failure_is_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        let interceptor = TileInterceptor::new(temp_dir.path(), MockHttpClient::failing("offline"));
        assert!(interceptor.intercept(URL).is_none());
    }

    #[test]
    fn test_concurrent_misses_fetch_once() {
        let temp_dir = tempfile::tempdir().unwrap();
        let interceptor = Arc::new(TileInterceptor::new(
            temp_dir.path(),
            MockHttpClient::ok(vec![5; 32]),
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let interceptor = Arc::clone(&interceptor);
                std::thread::spawn(move || interceptor.resolve(URL).unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), vec![5; 32]);
        }
        assert_eq!(interceptor.client.call_count(), 1);
    }
}
