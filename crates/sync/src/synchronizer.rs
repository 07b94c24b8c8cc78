//! Versioned refreshes of the structure tree
//!
//! Every request takes a sequence number when it is issued. When a response
//! arrives, it is applied only if no newer request has been issued in the
//! meantime; otherwise it is dropped without any notification. Locks are
//! released before every `.await`.

use crate::channel::{ChannelError, StructureChannel};
use crate::config::SyncConfig;
use crate::merge::{merge_roots, MergeSummary};
use crate::Result;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use stree_core::{decode_groups, decode_roots, IndexUpdated, Node, ProjectGroups, StructureParams};
use stree_store::{GroupSelection, GroupStore, VisibilityStore};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Where the most recently issued refresh currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    /// Waiting for the source to answer
    Requesting,
    /// Decoding and installing the answer
    Merging,
    /// The request failed; roots are unchanged
    Failed,
}

/// Change notification for UI hosts
#[derive(Debug, Clone)]
pub enum TreeChange {
    /// Anything may have changed; re-read from the roots
    All,
    /// Only these nodes need re-rendering
    Nodes(Vec<Arc<Node>>),
}

/// Result of a refresh that reached its response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A full refresh installed this many roots
    Replaced { roots: usize },
    /// A scoped refresh was merged into the roots
    Merged(MergeSummary),
    /// A newer request was issued before this one resolved
    Superseded,
}

/// What to refetch after the group selection of a project changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshAfterGrouping {
    Scoped,
    Full,
    None,
}

/// Owner of the live root sequence
pub struct StructureSync<S> {
    /// Source of structure data
    channel: Arc<dyn StructureChannel>,
    /// Group selections sent with every request
    visibility: Arc<VisibilityStore<S>>,
    config: SyncConfig,
    /// Current top-level nodes in display order
    roots: RwLock<Vec<Arc<Node>>>,
    phase: Mutex<SyncPhase>,
    /// Sequence number of the most recently issued request
    issued: AtomicU64,
    events: broadcast::Sender<TreeChange>,
}

impl<S: GroupStore> StructureSync<S> {
    pub fn new(
        channel: Arc<dyn StructureChannel>,
        visibility: Arc<VisibilityStore<S>>,
        config: SyncConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(config.notification_capacity.max(1));
        Self {
            channel,
            visibility,
            config,
            roots: RwLock::new(Vec::new()),
            phase: Mutex::new(SyncPhase::Idle),
            issued: AtomicU64::new(0),
            events,
        }
    }

    /// Snapshot of the current roots
    pub fn roots(&self) -> Vec<Arc<Node>> {
        self.roots.read().clone()
    }

    pub fn phase(&self) -> SyncPhase {
        *self.phase.lock()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TreeChange> {
        self.events.subscribe()
    }

    pub fn visibility(&self) -> &Arc<VisibilityStore<S>> {
        &self.visibility
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Broadcast a change to every subscriber
    pub fn notify(&self, change: TreeChange) {
        if self.events.send(change).is_err() {
            debug!("Tree change dropped: no subscribers");
        }
    }

    /// Refetch the whole tree and replace the roots
    ///
    /// Fires [`TreeChange::All`] when the request is issued and again once
    /// the new roots are installed.
    pub async fn refresh_full(&self, update_metadata: bool) -> Result<RefreshOutcome> {
        let params = StructureParams::full(update_metadata, self.visibility.request_groups());
        let seq = self.issue();
        info!("Refresh #{}: requesting full structure (update_metadata={})", seq, update_metadata);
        self.notify(TreeChange::All);

        let json = match self.request(self.channel.fetch_structure(&params)).await {
            Ok(json) => json,
            Err(e) => {
                if self.fail(seq, &e) {
                    // Clear the host's loading indication
                    self.notify(TreeChange::All);
                }
                return Err(e.into());
            }
        };

        if !self.begin_merge(seq) {
            return Ok(RefreshOutcome::Superseded);
        }
        let decoded = decode_roots(&json);
        let count = decoded.len();

        {
            let mut roots = self.roots.write();
            if !self.is_latest(seq) {
                debug!("Refresh #{}: superseded while decoding", seq);
                return Ok(RefreshOutcome::Superseded);
            }
            *roots = decoded;
        }

        self.transition(seq, SyncPhase::Idle);
        info!("Refresh #{}: installed {} root(s)", seq, count);
        self.notify(TreeChange::All);
        Ok(RefreshOutcome::Replaced { roots: count })
    }

    /// Refetch only the given top-level entities and merge them in
    ///
    /// Fires a single [`TreeChange::All`] after the merge. An empty key list
    /// falls back to a full refresh.
    pub async fn refresh_scoped(&self, keys: &[String]) -> Result<RefreshOutcome> {
        if keys.is_empty() {
            debug!("Scoped refresh without keys; refreshing everything");
            return self.refresh_full(false).await;
        }

        let params = StructureParams::scoped(keys.to_vec(), self.visibility.request_groups());
        let seq = self.issue();
        info!("Refresh #{}: requesting {} project(s): {}", seq, keys.len(), keys.join(", "));

        let json = match self.request(self.channel.fetch_structure(&params)).await {
            Ok(json) => json,
            Err(e) => {
                self.fail(seq, &e);
                return Err(e.into());
            }
        };

        if !self.begin_merge(seq) {
            return Ok(RefreshOutcome::Superseded);
        }
        let decoded = decode_roots(&json);

        let summary = {
            let mut roots = self.roots.write();
            if !self.is_latest(seq) {
                debug!("Refresh #{}: superseded while decoding", seq);
                return Ok(RefreshOutcome::Superseded);
            }
            let merged = merge_roots(&roots, decoded, keys);
            *roots = merged.roots;
            merged.summary
        };

        self.transition(seq, SyncPhase::Idle);
        self.notify(TreeChange::All);
        Ok(RefreshOutcome::Merged(summary))
    }

    /// React to an index change signalled by the source
    pub async fn handle_index_updated(&self, update: &IndexUpdated) -> Result<RefreshOutcome> {
        match update.scope() {
            None => self.refresh_full(false).await,
            Some(_) if !self.config.scoped_refresh => {
                debug!("Scoped refresh disabled; refreshing everything");
                self.refresh_full(false).await
            }
            Some(keys) => self.refresh_scoped(keys).await,
        }
    }

    /// Fetch the group catalog and record it as the available set
    pub async fn fetch_groups(&self) -> Result<Vec<ProjectGroups>> {
        let json = self.request(self.channel.fetch_groups()).await?;
        let catalog = decode_groups(&json);
        debug!("Fetched groups for {} project(s)", catalog.len());
        self.visibility.set_available(catalog.clone());
        Ok(catalog)
    }

    /// Persist a new group selection, then refetch as requested
    pub async fn set_selected_groups(
        &self,
        key: &str,
        selection: GroupSelection,
        refresh: RefreshAfterGrouping,
    ) -> Result<Option<RefreshOutcome>> {
        self.visibility.set_selected_groups(key, selection).await?;

        match refresh {
            RefreshAfterGrouping::Scoped => self.refresh_scoped(&[key.to_string()]).await.map(Some),
            RefreshAfterGrouping::Full => self.refresh_full(false).await.map(Some),
            RefreshAfterGrouping::None => Ok(None),
        }
    }

    async fn request<F>(&self, request: F) -> std::result::Result<Value, ChannelError>
    where
        F: Future<Output = std::result::Result<Value, ChannelError>>,
    {
        match self.config.request_timeout() {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .map_err(|_| ChannelError::Timeout(limit))?,
            None => request.await,
        }
    }

    fn issue(&self) -> u64 {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.transition(seq, SyncPhase::Requesting);
        seq
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == seq
    }

    fn begin_merge(&self, seq: u64) -> bool {
        if !self.is_latest(seq) {
            debug!("Refresh #{}: superseded, discarding response", seq);
            return false;
        }
        self.transition(seq, SyncPhase::Merging);
        true
    }

    /// Record a failed request; true when it was the latest one
    fn fail(&self, seq: u64, error: &ChannelError) -> bool {
        warn!("Refresh #{}: {}", seq, error);
        if !self.is_latest(seq) {
            return false;
        }
        self.transition(seq, SyncPhase::Failed);
        self.transition(seq, SyncPhase::Idle);
        true
    }

    /// Move the phase, unless a newer request already owns it
    fn transition(&self, seq: u64, to: SyncPhase) {
        let mut phase = self.phase.lock();
        if !self.is_latest(seq) {
            return;
        }
        debug!("Refresh #{}: {:?} -> {:?}", seq, *phase, to);
        *phase = to;
    }
}
