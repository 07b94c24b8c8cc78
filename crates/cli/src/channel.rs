//! Structure source backed by JSON files
//!
//! Each fetch re-reads the snapshot from disk. Scoped requests only get the
//! roots of the affected projects back, the way a language server answers
//! them.

use crate::snapshot;
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use stree_core::StructureParams;
use stree_sync::{ChannelError, StructureChannel};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct FileChannel {
    /// Structure snapshot
    structure: Option<PathBuf>,
    /// Group catalog; an absent file means no groups
    groups: Option<PathBuf>,
}

impl FileChannel {
    pub fn new(structure: impl Into<PathBuf>) -> Self {
        Self {
            structure: Some(structure.into()),
            groups: None,
        }
    }

    /// Channel serving only a group catalog
    pub fn groups_only(groups: impl Into<PathBuf>) -> Self {
        Self {
            structure: None,
            groups: Some(groups.into()),
        }
    }

    pub fn with_groups(mut self, groups: Option<PathBuf>) -> Self {
        self.groups = groups;
        self
    }

    pub fn structure_path(&self) -> Option<&Path> {
        self.structure.as_deref()
    }

    async fn read_json(path: &Path) -> Result<Value, ChannelError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ChannelError::Transport(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| ChannelError::Rejected(format!("{}: {}", path.display(), e)))
    }
}

#[async_trait]
impl StructureChannel for FileChannel {
    async fn fetch_structure(&self, params: &StructureParams) -> Result<Value, ChannelError> {
        let path = self
            .structure
            .as_deref()
            .ok_or_else(|| ChannelError::Transport("no structure snapshot configured".to_string()))?;
        let payload = Self::read_json(path).await?;

        if let Some(groups) = &params.groups {
            debug!("Group restrictions for {} project(s) ignored by file source", groups.len());
        }

        let Some(affected) = &params.affected_projects else {
            return Ok(payload);
        };

        let scoped: Vec<Value> = snapshot::roots(&payload)
            .iter()
            .filter(|root| {
                snapshot::project_key(root).is_some_and(|key| affected.iter().any(|a| a == key))
            })
            .cloned()
            .collect();
        debug!("Scoped snapshot to {} of {} affected project(s)", scoped.len(), affected.len());
        Ok(Value::Array(scoped))
    }

    async fn fetch_groups(&self) -> Result<Value, ChannelError> {
        match &self.groups {
            Some(path) if path.exists() => Self::read_json(path).await,
            _ => Ok(Value::Array(Vec::new())),
        }
    }
}
