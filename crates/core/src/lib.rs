//! Structure tree model for stree
//!
//! This crate provides:
//! - Typed node variants plus the generic stereotyped fallback
//! - Decoding of the discriminator-tagged wire format
//! - Stable node identities that survive re-fetches
//! - Tree item projection for UI hosts
//! - Request/notification wire types shared with the fetch channel

pub mod decode;
pub mod error;
pub mod identity;
pub mod item;
pub mod location;
pub mod node;
pub mod wire;

// Re-exports
pub use decode::{decode_roots, try_decode};
pub use error::DecodeError;
pub use item::{Collapsible, Expansion, OpenLocation, TreeItem, CONTEXT_STEREOTYPED_WITH_REFERENCE};
pub use location::{Location, Position, Range};
pub use node::{Node, NodeHints, NodeKind, NodeKindTag};
pub use wire::{decode_groups, Group, IndexUpdated, ProjectGroups, StructureParams};
