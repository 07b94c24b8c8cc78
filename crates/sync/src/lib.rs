//! Keeping a structure tree in sync with its source
//!
//! This crate provides:
//! - The `StructureChannel` seam to the process that owns the index
//! - `StructureSync`: versioned full and scoped refreshes with change events
//! - Scoped merging of partial results into the held roots
//! - `TreeView`: the host-facing adapter owning expansion state
//! - `GroupingModel`: the group selection dialog state

pub mod channel;
pub mod config;
pub mod error;
pub mod expansion;
pub mod grouping;
pub mod merge;
pub mod synchronizer;
pub mod view;

// Re-exports
pub use channel::{ChannelError, StructureChannel};
pub use config::SyncConfig;
pub use error::SyncError;
pub use expansion::ExpansionStates;
pub use grouping::{GroupItem, GroupingModel, ProjectItem};
pub use merge::{merge_roots, MergeResult, MergeSummary};
pub use synchronizer::{RefreshAfterGrouping, RefreshOutcome, StructureSync, SyncPhase, TreeChange};
pub use view::TreeView;

/// Result type for synchronizer operations
pub type Result<T> = std::result::Result<T, SyncError>;
