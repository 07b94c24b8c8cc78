//! Synchronizer error type

use crate::channel::ChannelError;
use stree_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("structure fetch failed: {0}")]
    Fetch(#[from] ChannelError),

    #[error("grouping store failed: {0}")]
    Store(#[from] StoreError),
}
