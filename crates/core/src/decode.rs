//! Decoding of the discriminator-tagged structure payload
//!
//! Each wire element is either a typed node (`kind` selects the variant and
//! the kind-specific fields sit next to it) or, when `kind` is absent, a
//! stereotyped node described by its `attributes` object. Elements that
//! cannot be decoded are dropped and logged; their siblings still decode.

use crate::error::DecodeError;
use crate::identity;
use crate::node::{attr, Node, NodeHints, NodeKind, NodeKindTag, ParentLink, StereotypedNode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

const KIND: &str = "kind";
const ATTRIBUTES: &str = "attributes";
const CHILDREN: &str = "children";

/// Decode a payload into root nodes
///
/// Accepts an array of siblings or a single object. Any other value yields
/// an empty sequence.
pub fn decode_roots(json: &Value) -> Vec<Arc<Node>> {
    let roots = match json {
        Value::Array(items) => decode_siblings(items, None),
        Value::Object(_) => decode_siblings(std::slice::from_ref(json), None),
        Value::Null => Vec::new(),
        other => {
            warn!("Structure payload is neither an array nor an object: {}", other);
            Vec::new()
        }
    };
    debug!("Decoded {} root node(s)", roots.len());
    roots
}

/// Decode a single element, optionally below an existing node
///
/// The result is not inserted into `parent`'s children; the parent only
/// contributes its back-reference and its path to the new node's identity.
pub fn try_decode(json: &Value, parent: Option<&Arc<Node>>) -> Result<Arc<Node>, DecodeError> {
    let link = parent.map(|p| ParentLink {
        node: Arc::downgrade(p),
        path: identity::join(&identity::parent_path(p), &p.label()),
    });
    decode_node(json, link.as_ref())
}

fn decode_node(json: &Value, parent: Option<&ParentLink>) -> Result<Arc<Node>, DecodeError> {
    let object = json.as_object().ok_or(DecodeError::NotAnObject)?;
    let (kind, hints) = decode_kind(json, object)?;

    Ok(Node::assemble(kind, hints, parent, |link| {
        decode_children(object.get(CHILDREN), link)
    }))
}

fn decode_children(children: Option<&Value>, link: &ParentLink) -> Vec<Arc<Node>> {
    match children {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => decode_siblings(items, Some(link)),
        Some(other) => {
            warn!("Ignoring non-array children below '{}': {}", link.path, other);
            Vec::new()
        }
    }
}

fn decode_siblings(items: &[Value], parent: Option<&ParentLink>) -> Vec<Arc<Node>> {
    items
        .iter()
        .filter_map(|item| match decode_node(item, parent) {
            Ok(node) => Some(node),
            Err(e) => {
                let path = parent.map(|p| p.path.as_str()).unwrap_or("<root>");
                warn!("Dropping structure element below {}: {}", path, e);
                None
            }
        })
        .collect()
}

fn decode_kind(json: &Value, object: &Map<String, Value>) -> Result<(NodeKind, NodeHints), DecodeError> {
    let tag = match object.get(KIND) {
        None | Some(Value::Null) => NodeKindTag::Stereotyped,
        Some(Value::String(name)) => {
            NodeKindTag::from_wire(name).ok_or_else(|| DecodeError::UnknownKind(name.clone()))?
        }
        Some(other) => return Err(DecodeError::UnknownKind(other.to_string())),
    };

    let kind = match tag {
        NodeKindTag::Stereotyped => {
            let attributes = match object.get(ATTRIBUTES) {
                Some(Value::Object(map)) => map.clone(),
                _ => Map::new(),
            };
            let node = StereotypedNode::new(attributes);
            let hints = node.hints();
            return Ok((NodeKind::Stereotyped(node), hints));
        }
        NodeKindTag::Project => NodeKind::Project(fields(tag, json)?),
        NodeKindTag::Document => NodeKind::Document(fields(tag, json)?),
        NodeKindTag::Bean => NodeKind::Bean(fields(tag, json)?),
        NodeKindTag::BeanMethodContainer => NodeKind::BeanMethodContainer(fields(tag, json)?),
        NodeKindTag::BeanRegistrar => NodeKind::BeanRegistrar(fields(tag, json)?),
        NodeKindTag::ConfigProperty => NodeKind::ConfigProperty(fields(tag, json)?),
        NodeKindTag::EventListener => NodeKind::EventListener(fields(tag, json)?),
        NodeKindTag::EventPublisher => NodeKind::EventPublisher(fields(tag, json)?),
        NodeKindTag::QueryMethod => NodeKind::QueryMethod(fields(tag, json)?),
        NodeKindTag::RequestMapping => NodeKind::RequestMapping(fields(tag, json)?),
        NodeKindTag::WebfluxRoute => NodeKind::WebfluxRoute(fields(tag, json)?),
        NodeKindTag::AotProcessor => NodeKind::AotProcessor(fields(tag, json)?),
    };

    let hint = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);
    let hints = NodeHints {
        node_id: hint(attr::NODE_ID),
        project_id: hint(attr::PROJECT_ID),
    };
    Ok((kind, hints))
}

fn fields<T: DeserializeOwned>(tag: NodeKindTag, json: &Value) -> Result<T, DecodeError> {
    T::deserialize(json).map_err(|source| DecodeError::InvalidFields {
        kind: tag.as_str(),
        source,
    })
}
