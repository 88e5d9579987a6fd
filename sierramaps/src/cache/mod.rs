//! Offline tile cache storage.
//!
//! - [`key`]: URL → filesystem-safe cache key
//! - [`DiskTileStore`]: one flat file per key under `{cache_dir}/tiles/`
//! - [`KeyedLocks`]: per-key mutual exclusion for concurrent misses

mod disk;
mod key;
mod locks;

use std::io;
use std::path::Path;

pub use disk::{ClearResult, DiskTileStore, TILES_DIR};
pub use key::{is_valid_key, sanitize, KEY_SEPARATOR};
pub use locks::{KeyGuard, KeyedLocks};

/// Remove every cached tile under `cache_dir`.
pub fn clear_disk_cache(cache_dir: &Path) -> io::Result<ClearResult> {
    DiskTileStore::new(cache_dir).clear()
}

/// Count cached tiles under `cache_dir`, returning `(files, bytes)`.
pub fn disk_cache_stats(cache_dir: &Path) -> io::Result<(u64, u64)> {
    DiskTileStore::new(cache_dir).stats()
}
