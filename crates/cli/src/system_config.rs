//! User-level configuration
//!
//! Stored as TOML in the user config directory (`~/.config/stree/config.toml`
//! on Linux). Setting `STREE_HOME` moves both the config file and the
//! grouping database under that directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use stree_sync::SyncConfig;

const CONFIG_FILE: &str = "config.toml";
const HOME_ENV: &str = "STREE_HOME";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub sync: SyncConfig,
    pub store: StoreConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory of the grouping database (default: user data directory)
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl SystemConfig {
    pub fn validate(&self) -> Result<()> {
        let capacity = self.sync.notification_capacity;
        if !(1..=65_536).contains(&capacity) {
            anyhow::bail!("sync.notification_capacity must be 1-65536 (got {})", capacity);
        }
        if let Some(timeout) = self.sync.request_timeout_ms {
            if !(1..=600_000).contains(&timeout) {
                anyhow::bail!("sync.request_timeout_ms must be 1-600000 (got {})", timeout);
            }
        }
        if !LOG_LEVELS.contains(&self.log.level.as_str()) {
            anyhow::bail!(
                "log.level must be one of {} (got '{}')",
                LOG_LEVELS.join(", "),
                self.log.level
            );
        }
        Ok(())
    }

    /// Directory of the grouping database
    pub fn store_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.store.path {
            return Ok(path.clone());
        }
        if let Some(home) = std::env::var_os(HOME_ENV) {
            return Ok(PathBuf::from(home).join("grouping"));
        }
        let data_dir = dirs::data_dir().context("Could not determine user data directory")?;
        Ok(data_dir.join("stree").join("grouping"))
    }
}

/// Directory holding the config file
pub fn config_dir() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Some(PathBuf::from(home));
    }
    dirs::config_dir().map(|dir| dir.join("stree"))
}

pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Load the config file, falling back to defaults when it does not exist
pub fn load() -> Result<SystemConfig> {
    match config_file_path() {
        Some(path) if path.exists() => load_from(&path),
        _ => Ok(SystemConfig::default()),
    }
}

pub fn load_from(path: &Path) -> Result<SystemConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: SystemConfig = toml::from_str(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(config)
}

pub fn save(config: &SystemConfig) -> Result<()> {
    let path = config_file_path().context("Could not determine config file path")?;
    save_to(config, &path)
}

pub fn save_to(config: &SystemConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let text = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Create the config file with defaults unless it exists
pub fn init_if_missing() -> Result<PathBuf> {
    let path = config_file_path().context("Could not determine config file path")?;
    if !path.exists() {
        save_to(&SystemConfig::default(), &path)?;
    }
    Ok(path)
}

pub fn example_config() -> &'static str {
    r#"# stree configuration

[sync]
# Merge index updates that name affected projects instead of refetching everything
scoped_refresh = true
# Capacity of the tree change channel
notification_capacity = 64
# Give up on a structure request after this many milliseconds (omit to wait forever)
# request_timeout_ms = 10000

[store]
# Directory of the grouping database (default: user data directory)
# path = "/home/me/.local/share/stree/grouping"

[log]
# trace, debug, info, warn or error; RUST_LOG takes precedence
level = "warn"
"#
}
