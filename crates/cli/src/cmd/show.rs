//! Print the structure tree of a snapshot

use anyhow::{Context, Result};
use cli_lib::render::{render_tree, RenderOptions};
use cli_lib::{system_config, FileChannel};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stree_store::GroupSelection;
use stree_sync::TreeView;

pub async fn run(
    input: &Path,
    groups: Option<PathBuf>,
    expand_all: bool,
    options: RenderOptions,
) -> Result<()> {
    let config = system_config::load()?;
    let has_catalog = groups.is_some();
    let channel = FileChannel::new(input).with_groups(groups);
    let sync = super::open_sync(&config, channel).await?;
    let view = TreeView::new(Arc::clone(&sync));

    let catalog = if has_catalog {
        sync.fetch_groups().await.context("Failed to read group catalog")?
    } else {
        Vec::new()
    };

    sync.refresh_full(false)
        .await
        .with_context(|| format!("Failed to load structure from {}", input.display()))?;

    if sync.roots().is_empty() {
        println!("{}", "(empty structure)".dimmed());
        return Ok(());
    }

    if expand_all {
        view.expand_all();
    }
    print!("{}", render_tree(&view, options));

    // Summarize restricted projects
    for entry in &catalog {
        if let GroupSelection::Only(ids) = sync.visibility().selected_groups(&entry.project_name) {
            println!(
                "{} {}: {} of {} group(s) visible",
                "groups".yellow(),
                entry.project_name.cyan(),
                ids.len(),
                entry.groups.len()
            );
        }
    }

    Ok(())
}
