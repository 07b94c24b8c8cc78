//! Payload builders and synchronizer setup

use serde_json::{json, Value};
use std::sync::Arc;
use stree_core::Node;
use stree_store::{MemoryGroupStore, VisibilityStore};
use stree_sync::{StructureChannel, StructureSync, SyncConfig};

/// A project root with the given children
pub fn project(name: &str, children: Vec<Value>) -> Value {
    json!({"kind": "project", "name": name, "children": children})
}

/// Childless project roots
pub fn projects(names: &[&str]) -> Value {
    Value::Array(names.iter().map(|name| project(name, Vec::new())).collect())
}

/// A stereotyped node with the given children
pub fn stereotype(text: &str, children: Vec<Value>) -> Value {
    json!({"attributes": {"text": text, "icon": "fa-stereotype"}, "children": children})
}

pub fn root_keys(roots: &[Arc<Node>]) -> Vec<String> {
    roots
        .iter()
        .map(|n| n.project_key().unwrap_or("<none>").to_string())
        .collect()
}

/// Synchronizer over `channel` with an in-memory grouping store
pub async fn sync_over(
    channel: Arc<dyn StructureChannel>,
    config: SyncConfig,
) -> Arc<StructureSync<MemoryGroupStore>> {
    let visibility = VisibilityStore::open(MemoryGroupStore::new())
        .await
        .expect("memory store opens");
    Arc::new(StructureSync::new(channel, Arc::new(visibility), config))
}
