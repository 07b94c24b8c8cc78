//! Projection of nodes into host-facing tree items

use crate::location::Range;
use crate::node::{Node, NodeKind};
use serde::{Deserialize, Serialize};

/// Context value marking stereotyped nodes that carry a reference payload
pub const CONTEXT_STEREOTYPED_WITH_REFERENCE: &str = "stereotypedNodeWithReference";

/// User-chosen expansion of a node with children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expansion {
    Expanded,
    Collapsed,
}

/// Collapsible state of a projected item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collapsible {
    /// Leaf; nothing to expand
    None,
    Collapsed,
    Expanded,
}

impl From<Expansion> for Collapsible {
    fn from(state: Expansion) -> Self {
        match state {
            Expansion::Expanded => Collapsible::Expanded,
            Expansion::Collapsed => Collapsible::Collapsed,
        }
    }
}

/// Navigation command attached to an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenLocation {
    pub uri: String,
    pub selection: Range,
}

/// What a UI host needs to render one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeItem {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<OpenLocation>,
    pub collapsible: Collapsible,
}

impl TreeItem {
    /// Project `node`, applying a previously recorded expansion if any
    ///
    /// Nodes without children are always leaves; others default to
    /// collapsed.
    pub fn project(node: &Node, saved: Option<Expansion>) -> Self {
        let collapsible = if node.has_children() {
            saved.map(Collapsible::from).unwrap_or(Collapsible::Collapsed)
        } else {
            Collapsible::None
        };

        let context_value = match node.kind() {
            NodeKind::Stereotyped(s) if s.reference().is_some() => {
                Some(CONTEXT_STEREOTYPED_WITH_REFERENCE.to_string())
            }
            _ => None,
        };

        let command = node.navigation_target().map(|location| OpenLocation {
            uri: location.uri,
            selection: location.range,
        });

        Self {
            id: node.node_id().to_string(),
            label: node.label().into_owned(),
            icon: node.icon().map(str::to_string),
            tooltip: node.hover().map(|h| h.into_owned()),
            context_value,
            command,
            collapsible,
        }
    }
}
