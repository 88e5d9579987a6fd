//! SierraMaps CLI - Command-line interface
//!
//! Fetch, prefetch and inspect offline map tiles using the SierraMaps
//! library.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::cache::CacheAction;
use commands::config::ConfigCommands;
use commands::fetch::FetchArgs;
use commands::prefetch::PrefetchArgs;

#[derive(Debug, Parser)]
#[command(name = "sierramaps", version, about = "Offline raster map tiles")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the cache directory from config.ini
    #[arg(long, global = true, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve one tile URL through the offline cache
    Fetch(FetchArgs),

    /// Warm the cache for a block of tiles
    Prefetch(PrefetchArgs),

    /// Inspect or clear the disk cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// View or edit configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Fetch(args) => commands::fetch::run(args, cli.cache_dir, cli.verbose),
        Command::Prefetch(args) => commands::prefetch::run(args, cli.cache_dir, cli.verbose),
        Command::Cache { action } => commands::cache::run(action, cli.cache_dir),
        Command::Config { command } => commands::config::run(command),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
