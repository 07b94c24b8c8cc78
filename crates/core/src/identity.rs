//! Stable node identities
//!
//! Decoded trees are always freshly allocated, so nodes are correlated
//! across refreshes by a string key derived from their own attributes and
//! the labels of their ancestors:
//!
//! ```text
//! id            = parent_path "/" node_specific  (or just node_specific at the root)
//! node_specific = text "|" location_key "|" reference_key, trailing '|' stripped
//! parent_path   = labels of all ancestors, root first, joined by "/"
//! ```
//!
//! Nodes without text, location, reference or parent all map to `""` and
//! therefore collide. Such nodes are placeholders and the collision is
//! accepted.

use crate::location::Location;
use crate::node::Node;
use serde_json::Value;
use smallvec::SmallVec;
use std::sync::Arc;

/// Identity segment contributed by a node itself
pub fn node_specific_id(text: &str, location: Option<&Location>, reference: Option<&Value>) -> String {
    let location_key = location.map(Location::key).unwrap_or_default();
    let reference_key = reference.map(reference_key).unwrap_or_default();

    let mut id = format!("{}|{}|{}", text, location_key, reference_key);
    let trimmed = id.trim_end_matches('|').len();
    id.truncate(trimmed);
    id
}

/// String form of an opaque reference payload
///
/// Strings are used verbatim, location-shaped objects contribute their
/// `uri`, anything else its compact JSON text.
pub fn reference_key(reference: &Value) -> String {
    match reference {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("uri").and_then(Value::as_str) {
            Some(uri) => uri.to_string(),
            None => reference.to_string(),
        },
        other => other.to_string(),
    }
}

/// Append a segment to a path, omitting the separator for an empty path
pub fn join(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{}/{}", path, segment)
    }
}

/// Path formed by the labels of all ancestors of `node`, root first
///
/// Walks the weak parent chain, so it only sees ancestors that are still
/// alive.
pub fn parent_path(node: &Node) -> String {
    let mut labels: SmallVec<[String; 8]> = SmallVec::new();
    let mut current: Option<Arc<Node>> = node.parent();
    while let Some(ancestor) = current {
        labels.push(ancestor.label().into_owned());
        current = ancestor.parent();
    }

    labels
        .iter()
        .rev()
        .fold(String::new(), |path, label| join(&path, label))
}

/// Recompute the derived identity of `node` from scratch
///
/// Ignores any explicit `nodeId` hint. For a node decoded without a hint
/// this equals [`Node::node_id`] while its ancestors are alive.
pub fn derive(node: &Node) -> String {
    let label = node.label();
    let location = node.location();
    let specific = node_specific_id(&label, location.as_deref(), node.reference());
    join(&parent_path(node), &specific)
}
