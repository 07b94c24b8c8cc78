//! Keep the tree in sync with a snapshot file
//!
//! File events are debounced, then the snapshot is compared per project
//! with the previous one. With `--scoped` only the changed projects are
//! refetched and merged; otherwise every change refetches the whole tree.

use anyhow::{Context, Result};
use cli_lib::render::{render_tree, RenderOptions};
use cli_lib::{snapshot, system_config, FileChannel};
use notify::{RecursiveMode, Watcher};
use owo_colors::OwoColorize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use stree_core::IndexUpdated;
use stree_store::SledGroupStore;
use stree_sync::{RefreshOutcome, StructureSync, TreeView};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const DEBOUNCE: Duration = Duration::from_millis(150);

/// Last observed snapshot content
struct Observed {
    text: String,
    projects: BTreeMap<String, String>,
}

impl Observed {
    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let payload: Value = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Self {
            projects: snapshot::fingerprints(&payload),
            text,
        })
    }
}

pub async fn run(input: &Path, scoped: bool, options: RenderOptions) -> Result<()> {
    let input = input
        .canonicalize()
        .with_context(|| format!("Snapshot not found: {}", input.display()))?;
    let watch_dir = input
        .parent()
        .map(Path::to_path_buf)
        .context("Snapshot has no parent directory")?;

    let mut config = system_config::load()?;
    config.sync.scoped_refresh = scoped;

    let sync = super::open_sync(&config, FileChannel::new(&input)).await?;
    let view = TreeView::new(Arc::clone(&sync));

    let mut observed = Observed::read(&input)?;
    sync.refresh_full(true).await.context("Initial structure load failed")?;
    view.expand_all();
    print_tree(&view, options, "loaded");

    // Bridge notify's callback thread into the runtime
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut watcher = notify::recommended_watcher(move |event: notify::Result<notify::Event>| {
        let _ = tx.send(event);
    })
    .context("Failed to create file watcher")?;
    watcher
        .watch(&watch_dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch {}", watch_dir.display()))?;

    info!("Watching {} (scoped: {})", input.display(), scoped);
    println!(
        "{} {} {}",
        "Watching".green(),
        input.display().cyan(),
        "(Ctrl-C to stop)".dimmed()
    );

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                if !touches(&event, &input) {
                    continue;
                }

                // Let the writer finish, then drop the burst
                tokio::time::sleep(DEBOUNCE).await;
                while rx.try_recv().is_ok() {}

                if let Err(e) = on_change(&sync, &view, &input, &mut observed, options).await {
                    warn!("Refresh failed: {:#}", e);
                    eprintln!("{} {:#}", "error:".red(), e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("Interrupted");
                break;
            }
        }
    }

    Ok(())
}

fn touches(event: &notify::Result<notify::Event>, input: &Path) -> bool {
    match event {
        Ok(event) => event.paths.iter().any(|path| path == input),
        Err(e) => {
            warn!("File watcher error: {}", e);
            false
        }
    }
}

async fn on_change(
    sync: &Arc<StructureSync<SledGroupStore>>,
    view: &TreeView<SledGroupStore>,
    input: &Path,
    observed: &mut Observed,
    options: RenderOptions,
) -> Result<()> {
    let current = Observed::read(input)?;
    if current.text == observed.text {
        debug!("Snapshot unchanged");
        return Ok(());
    }

    let changed = snapshot::changed_projects(&observed.projects, &current.projects);
    *observed = current;

    let update = if changed.is_empty() {
        IndexUpdated::all()
    } else {
        IndexUpdated::projects(changed)
    };

    let outcome = sync.handle_index_updated(&update).await?;
    let headline = match &outcome {
        RefreshOutcome::Replaced { roots } => format!("reloaded {} root(s)", roots),
        RefreshOutcome::Merged(summary) => format!(
            "merged: {} replaced, {} removed, {} added",
            summary.replaced.len(),
            summary.removed.len(),
            summary.added.len()
        ),
        RefreshOutcome::Superseded => return Ok(()),
    };
    print_tree(view, options, &headline);
    Ok(())
}

fn print_tree(view: &TreeView<SledGroupStore>, options: RenderOptions, headline: &str) {
    println!("\n{} {}", "==".dimmed(), headline.bold());
    print!("{}", render_tree(view, options));
}
