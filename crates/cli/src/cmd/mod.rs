//! CLI command implementations

pub mod config;
pub mod groups;
pub mod show;
pub mod watch;

use anyhow::{Context, Result};
use cli_lib::{FileChannel, SystemConfig};
use std::sync::Arc;
use stree_store::{SledGroupStore, VisibilityStore};
use stree_sync::StructureSync;

/// Synchronizer over `channel` with the user's grouping database
pub async fn open_sync(
    config: &SystemConfig,
    channel: FileChannel,
) -> Result<Arc<StructureSync<SledGroupStore>>> {
    let store_path = config.store_path()?;
    std::fs::create_dir_all(&store_path)
        .with_context(|| format!("Failed to create {}", store_path.display()))?;

    let store = SledGroupStore::open(&store_path)
        .with_context(|| format!("Failed to open grouping database at {}", store_path.display()))?;
    let visibility = VisibilityStore::open(store)
        .await
        .context("Failed to load grouping selections")?;

    Ok(Arc::new(StructureSync::new(
        Arc::new(channel),
        Arc::new(visibility),
        config.sync.clone(),
    )))
}
