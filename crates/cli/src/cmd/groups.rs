//! Group visibility commands

use anyhow::{Context, Result};
use cli_lib::{system_config, FileChannel};
use owo_colors::OwoColorize;
use std::path::Path;
use std::sync::Arc;
use stree_store::SledGroupStore;
use stree_sync::{GroupingModel, RefreshAfterGrouping, StructureSync};

async fn load_model(groups: &Path) -> Result<(Arc<StructureSync<SledGroupStore>>, GroupingModel)> {
    let config = system_config::load()?;
    let sync = super::open_sync(&config, FileChannel::groups_only(groups)).await?;
    let catalog = sync
        .fetch_groups()
        .await
        .with_context(|| format!("Failed to read group catalog {}", groups.display()))?;

    let visibility = sync.visibility();
    let model = GroupingModel::load(&catalog, |project| visibility.selected_groups(project));
    Ok((sync, model))
}

/// Print every project's groups with their check marks
pub async fn run_list(groups: &Path) -> Result<()> {
    let (_sync, model) = load_model(groups).await?;

    if model.projects().is_empty() {
        println!("{}", "No groups available".dimmed());
        return Ok(());
    }

    for project in model.projects() {
        let mark = match project.checked() {
            Some(true) => "[x]",
            Some(false) => "[ ]",
            None => "[~]",
        };
        println!("{} {}", mark, project.project_name.bold());
        for group in &project.groups {
            println!(
                "    {} {} {}",
                if group.checked { "[x]" } else { "[ ]" },
                group.identifier,
                format!("({})", group.display_name).dimmed()
            );
        }
    }
    Ok(())
}

/// Show exactly `ids` (or every group with `all`) for `project`
pub async fn run_set(project: &str, ids: &[String], all: bool, groups: &Path) -> Result<()> {
    let (sync, mut model) = load_model(groups).await?;

    let item = model
        .project_mut(project)
        .with_context(|| format!("Unknown project '{}' in group catalog", project))?;

    item.set_checked(all);
    if !all {
        for id in ids {
            if !item.set_group_checked(id, true) {
                anyhow::bail!("Project '{}' has no group '{}'", project, id);
            }
        }
    }
    let selection = item.selection();

    sync.set_selected_groups(project, selection.clone(), RefreshAfterGrouping::None)
        .await
        .context("Failed to save group selection")?;

    if selection.is_all() {
        println!("{} {}: all groups visible", "✓".green(), project.cyan());
    } else {
        println!(
            "{} {}: {} group(s) visible",
            "✓".green(),
            project.cyan(),
            ids.len()
        );
    }
    Ok(())
}
