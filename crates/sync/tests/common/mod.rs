//! Common utilities for synchronizer integration tests

pub mod channel;
pub mod fixtures;

// Re-export commonly used items
#[allow(unused_imports)]
pub use channel::{ScriptedChannel, Responder};
#[allow(unused_imports)]
pub use fixtures::{project, projects, root_keys, stereotype, sync_over};
