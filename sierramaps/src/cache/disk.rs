//! Disk storage for cached tiles.
//!
//! One file per cache key, flat, under `{root}/tiles/`. There is no index
//! and no metadata: a tile is cached if and only if its file exists.
//!
//! Writes go straight to the final path. A crash mid-write leaves a
//! truncated file that is served as-is until the cache is cleared.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::key::is_valid_key;

/// Name of the tile subdirectory inside the host cache directory.
pub const TILES_DIR: &str = "tiles";

/// Result of clearing the tile cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearResult {
    /// Number of cache files removed.
    pub files_deleted: u64,
    /// Total bytes freed.
    pub bytes_freed: u64,
}

/// Flat file store for tile bytes keyed by sanitized URL.
#[derive(Debug, Clone)]
pub struct DiskTileStore {
    dir: PathBuf,
}

impl DiskTileStore {
    /// Create a store rooted at `cache_root/tiles`.
    ///
    /// Nothing is created on disk until [`ensure_dir`](Self::ensure_dir)
    /// or [`write`](Self::write) is called.
    pub fn new(cache_root: impl AsRef<Path>) -> Self {
        Self {
            dir: cache_root.as_ref().join(TILES_DIR),
        }
    }

    /// The directory holding tile files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the tile directory (and parents) if absent.
    pub fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir)
    }

    /// Path of the file for a cache key.
    pub fn path_for(&self, key: &str) -> PathBuf {
        debug_assert!(is_valid_key(key), "not a sanitized cache key: {key:?}");
        self.dir.join(key)
    }

    /// Whether a file exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.path_for(key).is_file()
    }

    /// Read the full contents for `key`.
    ///
    /// Returns `Ok(None)` if no file exists.
    pub fn read(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write `data` as the contents for `key`, replacing any existing file.
    pub fn write(&self, key: &str, data: &[u8]) -> io::Result<()> {
        self.ensure_dir()?;
        let path = self.path_for(key);
        fs::write(&path, data)?;
        debug!(path = %path.display(), bytes = data.len(), "Tile written to disk cache");
        Ok(())
    }

    /// Count cached files and their total size.
    ///
    /// A missing directory counts as an empty cache.
    pub fn stats(&self) -> io::Result<(u64, u64)> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok((0, 0)),
            Err(e) => return Err(e),
        };

        let mut files = 0u64;
        let mut bytes = 0u64;
        for entry in entries {
            let metadata = entry?.metadata()?;
            if metadata.is_file() {
                files += 1;
                bytes += metadata.len();
            }
        }
        Ok((files, bytes))
    }

    /// Remove every cached tile file.
    ///
    /// The tile directory itself is kept.
    pub fn clear(&self) -> io::Result<ClearResult> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ClearResult::default()),
            Err(e) => return Err(e),
        };

        let mut result = ClearResult::default();
        for entry in entries {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            fs::remove_file(entry.path())?;
            result.files_deleted += 1;
            result.bytes_freed += metadata.len();
        }

        info!(
            dir = %self.dir.display(),
            files = result.files_deleted,
            bytes = result.bytes_freed,
            "Disk tile cache cleared"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_construction() {
        let store = DiskTileStore::new("/cache");
        assert_eq!(store.dir(), Path::new("/cache/tiles"));
        assert_eq!(
            store.path_for("https___host_tiles_1_2_3"),
            PathBuf::from("/cache/tiles/https___host_tiles_1_2_3")
        );
    }

    #[test]
    fn test_new_does_not_touch_disk() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = DiskTileStore::new(temp_dir.path());
        assert!(!store.dir().exists());
    }

    #[test]
    fn test_write_creates_dir_and_roundtrips() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = DiskTileStore::new(temp_dir.path());

        assert!(!store.contains("k"));
        assert_eq!(store.read("k").unwrap(), None);

        let data = vec![0x89, b'P', b'N', b'G'];
        store.write("k", &data).unwrap();

        assert!(store.dir().is_dir());
        assert!(store.contains("k"));
        assert_eq!(store.read("k").unwrap(), Some(data));
    }

    #[test]
    fn test_write_replaces_existing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = DiskTileStore::new(temp_dir.path());

        store.write("k", &[1, 2, 3]).unwrap();
        store.write("k", &[4]).unwrap();
        assert_eq!(store.read("k").unwrap(), Some(vec![4]));
    }

    #[test]
    fn test_truncated_file_is_served_as_is() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = DiskTileStore::new(temp_dir.path());
        store.ensure_dir().unwrap();
        fs::write(store.path_for("k"), b"").unwrap();

        assert_eq!(store.read("k").unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_stats_missing_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = DiskTileStore::new(temp_dir.path());
        assert_eq!(store.stats().unwrap(), (0, 0));
    }

    #[test]
    fn test_stats_counts_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = DiskTileStore::new(temp_dir.path());

        store.write("a", &[0u8; 100]).unwrap();
        store.write("b", &[0u8; 250]).unwrap();

        assert_eq!(store.stats().unwrap(), (2, 350));
    }

    #[test]
    fn test_clear_removes_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = DiskTileStore::new(temp_dir.path());

        store.write("a", &[0u8; 10]).unwrap();
        store.write("b", &[0u8; 20]).unwrap();

        let result = store.clear().unwrap();
        assert_eq!(
            result,
            ClearResult {
                files_deleted: 2,
                bytes_freed: 30
            }
        );
        assert!(!store.contains("a"));
        assert!(store.dir().is_dir());
        assert_eq!(store.stats().unwrap(), (0, 0));
    }

    #[test]
    fn test_clear_missing_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = DiskTileStore::new(temp_dir.path());
        assert_eq!(store.clear().unwrap(), ClearResult::default());
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "not a sanitized cache key")]
    fn test_path_for_rejects_raw_url() {
        let store = DiskTileStore::new("/tmp/cache");
        let _ = store.path_for("../outside/tile.png");
    }
}
