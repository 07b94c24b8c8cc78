//! Merging scoped refresh results into the held roots
//!
//! Roots are correlated by their project key. Entries outside the affected
//! set are carried over as the very same `Arc`, so identities and any
//! expansion state recorded for them stay valid.

use ahash::{AHashMap, AHashSet};
use std::sync::Arc;
use stree_core::Node;
use tracing::{debug, warn};

/// Keys touched by a merge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Affected keys whose old root was substituted in place
    pub replaced: Vec<String>,
    /// Affected keys the response omitted
    pub removed: Vec<String>,
    /// Keys appended at the end
    pub added: Vec<String>,
}

impl MergeSummary {
    pub fn is_empty(&self) -> bool {
        self.replaced.is_empty() && self.removed.is_empty() && self.added.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct MergeResult {
    pub roots: Vec<Arc<Node>>,
    pub summary: MergeSummary,
}

/// Merge the decoded `new` roots of a scoped refresh into `old`
pub fn merge_roots(old: &[Arc<Node>], new: Vec<Arc<Node>>, affected: &[String]) -> MergeResult {
    let affected: AHashSet<&str> = affected.iter().map(String::as_str).collect();
    let old_keys: AHashSet<&str> = old.iter().filter_map(|n| n.project_key()).collect();

    // First new root per key
    let mut new_by_key: AHashMap<&str, usize> = AHashMap::new();
    for (i, node) in new.iter().enumerate() {
        if let Some(key) = node.project_key() {
            new_by_key.entry(key).or_insert(i);
        }
    }

    let mut placed = vec![false; new.len()];
    let mut handled: AHashSet<&str> = AHashSet::new();
    let mut summary = MergeSummary::default();
    let mut roots = Vec::with_capacity(old.len().max(new.len()));

    for node in old {
        let key = match node.project_key() {
            Some(key) if affected.contains(key) => key,
            _ => {
                roots.push(Arc::clone(node));
                continue;
            }
        };

        // Later duplicates of an affected key vanish with the first one
        if !handled.insert(key) {
            continue;
        }

        match new_by_key.get(key) {
            Some(&i) => {
                roots.push(Arc::clone(&new[i]));
                placed[i] = true;
                summary.replaced.push(key.to_string());
            }
            None => summary.removed.push(key.to_string()),
        }
    }

    for (i, node) in new.iter().enumerate() {
        if placed[i] {
            continue;
        }
        match node.project_key() {
            Some(key) if new_by_key.get(key) != Some(&i) => {
                debug!("Ignoring duplicate root '{}' in scoped response", key);
            }
            Some(key) if affected.contains(key) || !old_keys.contains(key) => {
                roots.push(Arc::clone(node));
                summary.added.push(key.to_string());
            }
            Some(key) => {
                debug!("Ignoring unrequested root '{}' in scoped response", key);
            }
            None if old.is_empty() => roots.push(Arc::clone(node)),
            None => {
                warn!("Ignoring root without project key in scoped response: '{}'", node.label());
            }
        }
    }

    debug!(
        "Merged scoped refresh: {} replaced, {} removed, {} added",
        summary.replaced.len(),
        summary.removed.len(),
        summary.added.len()
    );

    MergeResult { roots, summary }
}
