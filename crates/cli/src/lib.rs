//! Library side of the `stree` host
//!
//! Everything the commands share and the integration tests exercise:
//! - `FileChannel`: a structure source backed by JSON files on disk
//! - Snapshot fingerprints for detecting affected projects
//! - Tree rendering for the terminal
//! - The user-level TOML configuration

pub mod channel;
pub mod render;
pub mod snapshot;
pub mod system_config;

// Re-exports
pub use channel::FileChannel;
pub use system_config::SystemConfig;
