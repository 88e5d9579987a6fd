//! Prefetch command - warm the offline cache for a block of tiles.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use sierramaps::executor::TileExecutor;
use sierramaps::tile::TileCoord;
use tokio_util::sync::CancellationToken;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Largest block a single prefetch run accepts.
pub const MAX_PREFETCH_TILES: u64 = 100_000;

/// Arguments for the prefetch command.
#[derive(Debug, Args)]
pub struct PrefetchArgs {
    /// Zoom level
    #[arg(short, long)]
    pub zoom: u8,

    /// Column range, inclusive (`A..B` or a single `A`)
    #[arg(long, value_parser = parse_range)]
    pub x: (u32, u32),

    /// Row range, inclusive (`A..B` or a single `A`)
    #[arg(long, value_parser = parse_range)]
    pub y: (u32, u32),

    /// Concurrent downloads (default from config)
    #[arg(short, long)]
    pub workers: Option<usize>,
}

/// Run the prefetch command.
pub fn run(args: PrefetchArgs, cache_dir: Option<PathBuf>, verbose: bool) -> Result<(), CliError> {
    check_block_size(&args)?;

    let runner = CliRunner::new(cache_dir, verbose)?;
    runner.log_startup("prefetch");
    let config = runner.config();

    let tiles = TileCoord::range(args.zoom, args.x.0..=args.x.1, args.y.0..=args.y.1);

    let template = &config.tiles.url_template;
    let urls: Vec<String> = tiles.iter().map(|tile| template.url_for(tile)).collect();
    let workers = args.workers.unwrap_or(config.executor.workers);

    println!(
        "Prefetching {} tiles at zoom {} into {}",
        urls.len(),
        args.zoom,
        runner.interceptor().store().dir().display()
    );
    println!("Press Ctrl+C to stop");

    let cancellation = CancellationToken::new();
    let handler_token = cancellation.clone();
    ctrlc::set_handler(move || {
        eprintln!();
        eprintln!("Received shutdown signal, stopping prefetch...");
        handler_token.cancel();
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    let progress = ProgressBar::new(urls.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} tiles ({msg}) {eta}")
            .map_err(|e| CliError::Config(e.to_string()))?,
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Runtime(e.to_string()))?;

    let interceptor = Arc::clone(runner.interceptor());
    let result = runtime.block_on(async {
        let executor = TileExecutor::new(interceptor, workers);
        executor
            .prefetch(urls, cancellation, |p| {
                progress.set_position(p.done as u64);
                progress.set_message(format!("{} failed", p.failed));
            })
            .await
    });
    progress.finish();

    println!();
    println!("  Already cached: {}", result.already_cached);
    println!("  Downloaded:     {}", result.resolved);
    println!("  Failed:         {}", result.failed);
    if result.was_cancelled {
        println!("  Skipped:        {} (cancelled)", result.skipped);
    }

    if result.failed > 0 {
        return Err(CliError::PrefetchFailures(result.failed));
    }
    Ok(())
}

/// Reject blocks with no in-grid tiles or more than [`MAX_PREFETCH_TILES`].
fn check_block_size(args: &PrefetchArgs) -> Result<u64, CliError> {
    let count = TileCoord::count(args.zoom, args.x.0..=args.x.1, args.y.0..=args.y.1);
    if count == 0 {
        return Err(CliError::Config(format!(
            "No valid tiles at zoom {} for x {}..{} y {}..{}",
            args.zoom, args.x.0, args.x.1, args.y.0, args.y.1
        )));
    }
    if count > MAX_PREFETCH_TILES {
        return Err(CliError::Config(format!(
            "Block of {} tiles exceeds the limit of {}; split it into smaller ranges",
            count, MAX_PREFETCH_TILES
        )));
    }
    Ok(count)
}

/// Parse `A..B` (inclusive) or `A` into a `(start, end)` pair.
fn parse_range(s: &str) -> Result<(u32, u32), String> {
    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .map_err(|_| format!("'{}' is not a tile index", v))
    };

    let (start, end) = match s.split_once("..") {
        Some((a, b)) => (parse(a)?, parse(b)?),
        None => {
            let v = parse(s)?;
            (v, v)
        }
    };

    if start > end {
        return Err(format!("range start {} is after end {}", start, end));
    }
    Ok((start, end))
}
