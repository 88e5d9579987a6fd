//! Fetch command - resolve a single tile through the offline cache.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use sierramaps::config::format_size;
use sierramaps::tile::{TileCoord, TileUrlTemplate};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the fetch command.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Tile URL, or `x/y/z` to use the configured tile server
    pub url: String,

    /// Write the tile here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Run the fetch command.
pub fn run(args: FetchArgs, cache_dir: Option<PathBuf>, verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(cache_dir, verbose)?;
    runner.log_startup("fetch");

    let url = target_url(&args.url, &runner.config().tiles.url_template)?;
    let interceptor = runner.interceptor();
    let was_cached = interceptor.is_cached(&url);
    let data = interceptor.resolve(&url)?;

    match args.output {
        Some(path) => {
            fs::write(&path, &data)?;
            eprintln!("Wrote {} to {}", format_size(data.len() as u64), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&data)?;
            stdout.flush()?;
        }
    }

    eprintln!(
        "{} {}",
        if was_cached { "Served from cache:" } else { "Fetched:" },
        url
    );
    Ok(())
}

/// Expand `x/y/z` shorthand through the template; pass full URLs through.
fn target_url(arg: &str, template: &TileUrlTemplate) -> Result<String, CliError> {
    if arg.contains("://") {
        return Ok(arg.to_string());
    }

    let parts: Vec<&str> = arg.split('/').collect();
    let parsed = match parts.as_slice() {
        [x, y, z] => match (x.parse(), y.parse(), z.parse()) {
            (Ok(x), Ok(y), Ok(z)) => Some(TileCoord::new(x, y, z)),
            _ => None,
        },
        _ => None,
    };

    parsed
        .map(|tile| template.url_for(&tile))
        .ok_or_else(|| CliError::Config(format!("Expected a URL or x/y/z, got '{}'", arg)))
}
