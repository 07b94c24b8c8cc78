//! Synchronizer settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for [`StructureSync`](crate::StructureSync)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Honor affected-project lists from index updates; when off every
    /// update triggers a full refresh
    pub scoped_refresh: bool,

    /// Capacity of the change event channel (default: 64)
    pub notification_capacity: usize,

    /// Per-request timeout in milliseconds; `None` waits indefinitely
    pub request_timeout_ms: Option<u64>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            scoped_refresh: true,
            notification_capacity: 64,
            request_timeout_ms: None,
        }
    }
}

impl SyncConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}
