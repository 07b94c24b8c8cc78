//! Configuration management command
//!
//! Provides CLI interface to view and edit the user configuration.

use anyhow::{Context, Result};
use cli_lib::system_config::{self, SystemConfig};
use owo_colors::OwoColorize;
use std::path::PathBuf;

const KEYS: [&str; 5] = [
    "sync.scoped_refresh",
    "sync.notification_capacity",
    "sync.request_timeout_ms",
    "store.path",
    "log.level",
];

/// List all configuration values
pub async fn run_list() -> Result<()> {
    let config = system_config::load()?;
    let config_path = system_config::config_file_path()
        .context("Could not determine config file path")?;

    println!("{}", "Configuration".bold());
    println!("{}: {}\n", "Location".dimmed(), config_path.display().dimmed());

    println!("{}", "[sync]".yellow());
    println!("  {} = {}", "scoped_refresh".cyan(), config.sync.scoped_refresh);
    println!(
        "  {} = {}",
        "notification_capacity".cyan(),
        config.sync.notification_capacity
    );
    println!(
        "  {} = {}",
        "request_timeout_ms".cyan(),
        match config.sync.request_timeout_ms {
            Some(ms) => format!("{} {}", ms, format!("({:.1}s)", ms as f64 / 1000.0).dimmed()),
            None => "none".dimmed().to_string(),
        }
    );

    println!("\n{}", "[store]".yellow());
    println!(
        "  {} = {} {}",
        "path".cyan(),
        get_value(&config, "store.path")?,
        if config.store.path.is_none() {
            format!("(default: {})", config.store_path()?.display()).dimmed().to_string()
        } else {
            String::new()
        }
    );

    println!("\n{}", "[log]".yellow());
    println!("  {} = {}", "level".cyan(), config.log.level);

    println!("\n{}", "Valid Ranges:".bold());
    println!("  notification_capacity: 1-65536");
    println!("  request_timeout_ms: 1-600000, or 'none'");
    println!("  level: trace, debug, info, warn, error");

    Ok(())
}

/// Get a single configuration value
pub async fn run_get(key: &str) -> Result<()> {
    let config = system_config::load()?;
    println!("{}", get_value(&config, key)?);
    Ok(())
}

/// Set a configuration value
pub async fn run_set(key: &str, value: &str) -> Result<()> {
    let mut config = system_config::load()?;
    set_value(&mut config, key, value)?;

    config.validate().context("Invalid configuration value")?;
    system_config::save(&config)?;

    println!("{} {} = {}", "✓".green(), key.cyan(), value);
    Ok(())
}

/// Show the config file path and optionally create it
pub async fn run_path(create: bool) -> Result<()> {
    let config_path = system_config::config_file_path()
        .context("Could not determine config file path")?;

    if create && !config_path.exists() {
        system_config::init_if_missing()?;
        println!("{} Created config file at: {}", "✓".green(), config_path.display());
    } else {
        println!("{}", config_path.display());
        if !config_path.exists() {
            println!("{}", "File does not exist. Use --create to create it.".yellow());
        }
    }

    Ok(())
}

/// Show example configuration
pub async fn run_example() -> Result<()> {
    println!("{}", system_config::example_config());
    Ok(())
}

fn get_value(config: &SystemConfig, key: &str) -> Result<String> {
    let value = match key {
        "sync.scoped_refresh" => config.sync.scoped_refresh.to_string(),
        "sync.notification_capacity" => config.sync.notification_capacity.to_string(),
        "sync.request_timeout_ms" => config
            .sync
            .request_timeout_ms
            .map(|ms| ms.to_string())
            .unwrap_or_else(|| "none".to_string()),
        "store.path" => config
            .store
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "none".to_string()),
        "log.level" => config.log.level.clone(),
        _ => return Err(unknown_key(key)),
    };
    Ok(value)
}

fn set_value(config: &mut SystemConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "sync.scoped_refresh" => {
            config.sync.scoped_refresh = value
                .parse()
                .context("Invalid value: must be 'true' or 'false'")?;
        }
        "sync.notification_capacity" => {
            config.sync.notification_capacity = value
                .parse()
                .context("Invalid value: must be a positive integer")?;
        }
        "sync.request_timeout_ms" => {
            config.sync.request_timeout_ms = match value {
                "none" => None,
                ms => Some(
                    ms.parse()
                        .context("Invalid value: must be a positive integer or 'none'")?,
                ),
            };
        }
        "store.path" => {
            config.store.path = match value {
                "none" => None,
                path => Some(PathBuf::from(path)),
            };
        }
        "log.level" => config.log.level = value.to_ascii_lowercase(),
        _ => return Err(unknown_key(key)),
    }
    Ok(())
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Unknown config key: {}. Available keys: {}",
        key,
        KEYS.join(", ")
    )
}
