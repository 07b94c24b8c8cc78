//! Durable grouping preferences for stree
//!
//! This crate provides:
//! - The `GroupStore` key/value seam with sled-backed and in-memory backends
//! - `VisibilityStore`, the per-project group selection consulted by every fetch

pub mod backend;
pub mod error;
pub mod visibility;

// Re-exports
pub use backend::{GroupStore, MemoryGroupStore, SledGroupStore, GROUPING_TREE};
pub use error::StoreError;
pub use visibility::{GroupSelection, VisibilityStore};

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
