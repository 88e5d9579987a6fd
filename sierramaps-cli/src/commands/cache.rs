//! Cache management CLI commands.

use std::path::PathBuf;

use clap::Subcommand;
use sierramaps::cache::{clear_disk_cache, disk_cache_stats, TILES_DIR};
use sierramaps::config::{format_size, ConfigFile};

use crate::error::CliError;

/// Cache action subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Clear the disk cache, removing all cached tiles
    Clear,
    /// Show disk cache statistics
    Stats,
    /// Print the tile cache directory
    Path,
}

/// Run a cache subcommand.
pub fn run(action: CacheAction, cache_dir: Option<PathBuf>) -> Result<(), CliError> {
    let cache_dir = match cache_dir {
        Some(dir) => dir,
        None => ConfigFile::load()?.cache.directory,
    };

    match action {
        CacheAction::Clear => {
            println!("Clearing disk cache at: {}", cache_dir.join(TILES_DIR).display());

            match clear_disk_cache(&cache_dir) {
                Ok(result) => {
                    println!(
                        "Deleted {} files, freed {}",
                        result.files_deleted,
                        format_size(result.bytes_freed)
                    );
                    Ok(())
                }
                Err(e) => Err(CliError::CacheClear(e.to_string())),
            }
        }
        CacheAction::Stats => {
            println!("Disk cache: {}", cache_dir.join(TILES_DIR).display());

            match disk_cache_stats(&cache_dir) {
                Ok((files, bytes)) => {
                    println!("  Tiles: {}", files);
                    println!("  Size:  {}", format_size(bytes));
                    Ok(())
                }
                Err(e) => Err(CliError::CacheStats(e.to_string())),
            }
        }
        CacheAction::Path => {
            println!("{}", cache_dir.join(TILES_DIR).display());
            Ok(())
        }
    }
}
