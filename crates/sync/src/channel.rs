//! Request/response seam to the structure source

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use stree_core::StructureParams;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    /// The source answered with an error
    #[error("structure request rejected: {0}")]
    Rejected(String),

    #[error("structure request timed out after {0:?}")]
    Timeout(Duration),

    /// The source could not be reached or its answer could not be read
    #[error("structure transport failed: {0}")]
    Transport(String),
}

/// The process that owns the structure index
///
/// Both calls return raw JSON; decoding happens on this side.
#[async_trait]
pub trait StructureChannel: Send + Sync {
    /// Fetch the structure tree, or the scoped part of it
    async fn fetch_structure(&self, params: &StructureParams) -> Result<Value, ChannelError>;

    /// Fetch the catalog of groups available per project
    async fn fetch_groups(&self) -> Result<Value, ChannelError>;
}
