//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, and `config path` commands
//! for viewing and modifying configuration settings from the command line.

use clap::Subcommand;
use sierramaps::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., tiles.url_template)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., http.timeout_secs)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(&key),
        ConfigCommands::Set { key, value } => run_set(&key, &value),
        ConfigCommands::List => run_list(),
        ConfigCommands::Path => run_path(),
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'sierramaps config list' to see available keys.",
            key
        ))
    })
}

/// Get a configuration value.
fn run_get(key: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let config = ConfigFile::load()?;
    println!("{}", config_key.get(&config));
    Ok(())
}

/// Set a configuration value, echoing the previous one.
fn run_set(key: &str, value: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;

    let mut config = ConfigFile::load()?;
    let previous = config_key.get(&config);
    config_key.set(&mut config, value)?;
    config.save()?;

    let current = config_key.get(&config);
    if previous == current {
        println!("{} unchanged ({})", config_key.name(), current);
    } else {
        println!("{}: {} -> {}", config_key.name(), previous, current);
    }
    Ok(())
}

/// List every key grouped by section, flagging values left at their default.
fn run_list() -> Result<(), CliError> {
    let config = ConfigFile::load()?;
    let defaults = ConfigFile::default();

    println!("# {}", config_file_path().display());
    for section in sections() {
        println!();
        println!("[{}]", section);
        for key in ConfigKey::all().iter().filter(|k| k.section() == section) {
            println!("{}", list_line(*key, &config, &defaults));
        }
    }
    Ok(())
}

/// Section names in key order, without repeats.
fn sections() -> Vec<&'static str> {
    let mut sections: Vec<&'static str> = Vec::new();
    for key in ConfigKey::all() {
        if !sections.contains(&key.section()) {
            sections.push(key.section());
        }
    }
    sections
}

fn list_line(key: ConfigKey, config: &ConfigFile, defaults: &ConfigFile) -> String {
    let value = key.get(config);
    let marker = if value == key.get(defaults) { "  (default)" } else { "" };
    format!("{:<14} = {}{}", key.key_name(), value, marker)
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}
