//! Host-facing tree adapter

use crate::expansion::ExpansionStates;
use crate::synchronizer::{StructureSync, TreeChange};
use parking_lot::RwLock;
use std::sync::Arc;
use stree_core::{Expansion, Node, TreeItem};
use stree_store::GroupStore;
use tracing::debug;

/// What a UI tree host talks to
///
/// Reads the synchronizer's roots and owns the expansion state, which is
/// keyed by node identity and therefore outlives individual snapshots.
pub struct TreeView<S> {
    sync: Arc<StructureSync<S>>,
    expansion: RwLock<ExpansionStates>,
}

impl<S: GroupStore> TreeView<S> {
    pub fn new(sync: Arc<StructureSync<S>>) -> Self {
        Self {
            sync,
            expansion: RwLock::new(ExpansionStates::new()),
        }
    }

    pub fn sync(&self) -> &Arc<StructureSync<S>> {
        &self.sync
    }

    /// Children of `node`, or the roots for `None`
    pub fn children(&self, node: Option<&Arc<Node>>) -> Vec<Arc<Node>> {
        match node {
            Some(node) => node.children().to_vec(),
            None => self.sync.roots(),
        }
    }

    pub fn parent(&self, node: &Node) -> Option<Arc<Node>> {
        node.parent()
    }

    pub fn tree_item(&self, node: &Node) -> TreeItem {
        let saved = self.expansion.read().get(node.node_id());
        TreeItem::project(node, saved)
    }

    /// Record the user's expand/collapse of `node`
    pub fn set_expanded(&self, node: &Node, expanded: bool) {
        let state = if expanded {
            Expansion::Expanded
        } else {
            Expansion::Collapsed
        };
        self.expansion.write().record(node.node_id(), state);
    }

    pub fn expansion_of(&self, node: &Node) -> Option<Expansion> {
        self.expansion.read().get(node.node_id())
    }

    pub fn expand_all(&self) {
        self.record_all(Expansion::Expanded);
    }

    pub fn collapse_all(&self) {
        self.record_all(Expansion::Collapsed);
    }

    fn record_all(&self, state: Expansion) {
        let roots = self.sync.roots();
        let mut recorded = 0usize;
        {
            let mut expansion = self.expansion.write();
            for root in &roots {
                root.walk(&mut |node| {
                    if node.has_children() {
                        expansion.record(node.node_id(), state);
                        recorded += 1;
                    }
                });
            }
        }
        debug!("Recorded {:?} for {} node(s)", state, recorded);
        self.sync.notify(TreeChange::Nodes(roots));
    }
}
