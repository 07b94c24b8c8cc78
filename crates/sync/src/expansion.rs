//! Transient expansion state keyed by node identity

use ahash::AHashMap;
use stree_core::Expansion;

/// Expanded/collapsed choices recorded by the user
///
/// Entries are keyed by node identity, so they survive refreshes for every
/// node whose identity is unchanged. Never persisted; never evicted.
#[derive(Debug, Default, Clone)]
pub struct ExpansionStates {
    states: AHashMap<String, Expansion>,
}

impl ExpansionStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Expansion> {
        self.states.get(id).copied()
    }

    pub fn record(&mut self, id: impl Into<String>, state: Expansion) {
        self.states.insert(id.into(), state);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
