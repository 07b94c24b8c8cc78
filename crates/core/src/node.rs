//! Node model for the structure tree
//!
//! Every node owns its children exclusively and keeps a weak back-reference
//! to its parent. Trees are immutable once decoded; a new fetch always
//! allocates a new tree, so "same object" means `Arc::ptr_eq`.

use crate::identity;
use crate::location::{Location, Range};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, Weak};

/// Attribute keys understood on stereotyped nodes
pub mod attr {
    pub const TEXT: &str = "text";
    pub const ICON: &str = "icon";
    pub const HOVER: &str = "hover";
    pub const LOCATION: &str = "location";
    pub const REFERENCE: &str = "reference";
    pub const NODE_ID: &str = "nodeId";
    pub const PROJECT_ID: &str = "projectId";
}

/// Discriminator of a node kind, as found in the `kind` wire field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKindTag {
    Project,
    Document,
    Bean,
    BeanMethodContainer,
    BeanRegistrar,
    ConfigProperty,
    EventListener,
    EventPublisher,
    QueryMethod,
    RequestMapping,
    WebfluxRoute,
    AotProcessor,
    Stereotyped,
}

impl NodeKindTag {
    pub const ALL: [NodeKindTag; 13] = [
        NodeKindTag::Project,
        NodeKindTag::Document,
        NodeKindTag::Bean,
        NodeKindTag::BeanMethodContainer,
        NodeKindTag::BeanRegistrar,
        NodeKindTag::ConfigProperty,
        NodeKindTag::EventListener,
        NodeKindTag::EventPublisher,
        NodeKindTag::QueryMethod,
        NodeKindTag::RequestMapping,
        NodeKindTag::WebfluxRoute,
        NodeKindTag::AotProcessor,
        NodeKindTag::Stereotyped,
    ];

    /// Wire name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKindTag::Project => "project",
            NodeKindTag::Document => "document",
            NodeKindTag::Bean => "bean",
            NodeKindTag::BeanMethodContainer => "beanMethodContainer",
            NodeKindTag::BeanRegistrar => "beanRegistrar",
            NodeKindTag::ConfigProperty => "configProperty",
            NodeKindTag::EventListener => "eventListener",
            NodeKindTag::EventPublisher => "eventPublisher",
            NodeKindTag::QueryMethod => "queryMethod",
            NodeKindTag::RequestMapping => "requestMapping",
            NodeKindTag::WebfluxRoute => "webfluxRoute",
            NodeKindTag::AotProcessor => "aotProcessor",
            NodeKindTag::Stereotyped => "stereotyped",
        }
    }

    /// Look up a kind by its wire name
    pub fn from_wire(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for NodeKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Spring project, the top-level discriminating entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectNode {
    pub name: String,
}

/// A source document inside a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentNode {
    pub doc_uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeanNode {
    pub name: String,
    #[serde(rename = "type")]
    pub bean_type: String,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub is_configuration: bool,
    #[serde(default)]
    pub symbol_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeanMethodContainerNode {
    #[serde(rename = "type")]
    pub container_type: String,
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeanRegistrarNode {
    pub name: String,
    #[serde(rename = "type")]
    pub registrar_type: String,
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPropertyNode {
    pub name: String,
    #[serde(rename = "type", default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListenerNode {
    pub event_type: String,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub container_bean_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPublisherNode {
    pub event_type: String,
    #[serde(default)]
    pub location: Option<Location>,
    /// Event types the published type is assignable to
    #[serde(default)]
    pub event_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryMethodNode {
    pub method_name: String,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMappingNode {
    pub path: String,
    #[serde(default)]
    pub http_methods: Vec<String>,
    #[serde(default)]
    pub content_types: Vec<String>,
    #[serde(default)]
    pub accept_types: Vec<String>,
    #[serde(default)]
    pub symbol_label: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
}

impl RequestMappingNode {
    fn label(&self) -> Cow<'_, str> {
        if let Some(label) = self.symbol_label.as_deref().filter(|l| !l.is_empty()) {
            return Cow::Borrowed(label);
        }
        if self.http_methods.is_empty() {
            Cow::Owned(format!("@{}", self.path))
        } else {
            Cow::Owned(format!("@{} -- {}", self.path, self.http_methods.join(" ")))
        }
    }
}

/// Functional (router) mapping whose definition spans several ranges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebfluxRouteNode {
    #[serde(flatten)]
    pub mapping: RequestMappingNode,
    #[serde(default)]
    pub doc_uri: Option<String>,
    #[serde(default)]
    pub ranges: Vec<Range>,
}

impl WebfluxRouteNode {
    fn location(&self) -> Option<Cow<'_, Location>> {
        if let Some(location) = &self.mapping.location {
            return Some(Cow::Borrowed(location));
        }
        let uri = self.doc_uri.as_ref()?;
        let range = self.ranges.first().copied().unwrap_or_default();
        Some(Cow::Owned(Location {
            uri: uri.clone(),
            range,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AotProcessorNode {
    #[serde(rename = "type")]
    pub processor_type: String,
    pub doc_uri: String,
}

/// Generic node described only by an open attribute map
#[derive(Debug, Clone, PartialEq)]
pub struct StereotypedNode {
    attributes: Map<String, Value>,
    location: Option<Location>,
}

impl StereotypedNode {
    pub fn new(attributes: Map<String, Value>) -> Self {
        let location = attributes.get(attr::LOCATION).and_then(Location::from_value);
        Self {
            attributes,
            location,
        }
    }

    fn str_attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    pub fn text(&self) -> &str {
        self.str_attr(attr::TEXT).unwrap_or("")
    }

    pub fn icon(&self) -> Option<&str> {
        self.str_attr(attr::ICON).filter(|icon| !icon.is_empty())
    }

    pub fn hover(&self) -> Option<&str> {
        self.str_attr(attr::HOVER)
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Opaque reference payload, if present and truthy
    ///
    /// `null`, `false`, `0` and `""` count as no reference.
    pub fn reference(&self) -> Option<&Value> {
        self.attributes.get(attr::REFERENCE).filter(|v| is_truthy(v))
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub(crate) fn hints(&self) -> NodeHints {
        NodeHints {
            node_id: self.str_attr(attr::NODE_ID).map(str::to_string),
            project_id: self.str_attr(attr::PROJECT_ID).map(str::to_string),
        }
    }
}

/// Kind-specific payload of a node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Project(ProjectNode),
    Document(DocumentNode),
    Bean(BeanNode),
    BeanMethodContainer(BeanMethodContainerNode),
    BeanRegistrar(BeanRegistrarNode),
    ConfigProperty(ConfigPropertyNode),
    EventListener(EventListenerNode),
    EventPublisher(EventPublisherNode),
    QueryMethod(QueryMethodNode),
    RequestMapping(RequestMappingNode),
    WebfluxRoute(WebfluxRouteNode),
    AotProcessor(AotProcessorNode),
    Stereotyped(StereotypedNode),
}

impl NodeKind {
    pub fn tag(&self) -> NodeKindTag {
        match self {
            NodeKind::Project(_) => NodeKindTag::Project,
            NodeKind::Document(_) => NodeKindTag::Document,
            NodeKind::Bean(_) => NodeKindTag::Bean,
            NodeKind::BeanMethodContainer(_) => NodeKindTag::BeanMethodContainer,
            NodeKind::BeanRegistrar(_) => NodeKindTag::BeanRegistrar,
            NodeKind::ConfigProperty(_) => NodeKindTag::ConfigProperty,
            NodeKind::EventListener(_) => NodeKindTag::EventListener,
            NodeKind::EventPublisher(_) => NodeKindTag::EventPublisher,
            NodeKind::QueryMethod(_) => NodeKindTag::QueryMethod,
            NodeKind::RequestMapping(_) => NodeKindTag::RequestMapping,
            NodeKind::WebfluxRoute(_) => NodeKindTag::WebfluxRoute,
            NodeKind::AotProcessor(_) => NodeKindTag::AotProcessor,
            NodeKind::Stereotyped(_) => NodeKindTag::Stereotyped,
        }
    }

    /// Display label; also the `text` segment of identities
    pub fn label(&self) -> Cow<'_, str> {
        match self {
            NodeKind::Project(p) => Cow::Borrowed(&p.name),
            NodeKind::Document(d) => Cow::Borrowed(last_segment(&d.doc_uri)),
            NodeKind::Bean(b) => match b.symbol_label.as_deref().filter(|l| !l.is_empty()) {
                Some(label) => Cow::Borrowed(label),
                None => Cow::Owned(format!("'{}' ({})", b.name, simple_name(&b.bean_type))),
            },
            NodeKind::BeanMethodContainer(c) => Cow::Borrowed(simple_name(&c.container_type)),
            NodeKind::BeanRegistrar(r) => {
                Cow::Owned(format!("{} ({})", r.name, simple_name(&r.registrar_type)))
            }
            NodeKind::ConfigProperty(p) => Cow::Borrowed(&p.name),
            NodeKind::EventListener(l) => {
                Cow::Owned(format!("listens on: {}", simple_name(&l.event_type)))
            }
            NodeKind::EventPublisher(p) => {
                Cow::Owned(format!("publishes: {}", simple_name(&p.event_type)))
            }
            NodeKind::QueryMethod(q) => Cow::Borrowed(&q.method_name),
            NodeKind::RequestMapping(m) => m.label(),
            NodeKind::WebfluxRoute(r) => r.mapping.label(),
            NodeKind::AotProcessor(a) => Cow::Borrowed(simple_name(&a.processor_type)),
            NodeKind::Stereotyped(s) => Cow::Borrowed(s.text()),
        }
    }

    pub fn icon(&self) -> Option<&str> {
        let icon = match self {
            NodeKind::Project(_) => "project",
            NodeKind::Document(_) => "file",
            NodeKind::Bean(b) if b.is_configuration => "symbol-namespace",
            NodeKind::Bean(_) | NodeKind::BeanMethodContainer(_) => "symbol-class",
            NodeKind::BeanRegistrar(_) => "symbol-constructor",
            NodeKind::ConfigProperty(_) => "symbol-property",
            NodeKind::EventListener(_) | NodeKind::EventPublisher(_) => "symbol-event",
            NodeKind::QueryMethod(_) => "symbol-method",
            NodeKind::RequestMapping(_) | NodeKind::WebfluxRoute(_) => "symbol-interface",
            NodeKind::AotProcessor(_) => "symbol-misc",
            NodeKind::Stereotyped(s) => return s.icon(),
        };
        Some(icon)
    }

    pub fn location(&self) -> Option<Cow<'_, Location>> {
        let location = match self {
            NodeKind::Project(_) => None,
            NodeKind::Document(d) => return Some(Cow::Owned(Location::document(&d.doc_uri))),
            NodeKind::Bean(b) => b.location.as_ref(),
            NodeKind::BeanMethodContainer(c) => c.location.as_ref(),
            NodeKind::BeanRegistrar(r) => r.location.as_ref(),
            NodeKind::ConfigProperty(p) => p.location.as_ref(),
            NodeKind::EventListener(l) => l.location.as_ref(),
            NodeKind::EventPublisher(p) => p.location.as_ref(),
            NodeKind::QueryMethod(q) => q.location.as_ref(),
            NodeKind::RequestMapping(m) => m.location.as_ref(),
            NodeKind::WebfluxRoute(r) => return r.location(),
            NodeKind::AotProcessor(a) => return Some(Cow::Owned(Location::document(&a.doc_uri))),
            NodeKind::Stereotyped(s) => s.location(),
        };
        location.map(Cow::Borrowed)
    }

    /// Opaque reference payload; only stereotyped nodes carry one
    pub fn reference(&self) -> Option<&Value> {
        match self {
            NodeKind::Stereotyped(s) => s.reference(),
            _ => None,
        }
    }

    pub fn tooltip(&self) -> Option<Cow<'_, str>> {
        match self {
            NodeKind::Bean(b) => Some(Cow::Borrowed(&b.bean_type)),
            NodeKind::EventListener(l) => Some(Cow::Borrowed(&l.event_type)),
            NodeKind::EventPublisher(p) => Some(Cow::Borrowed(&p.event_type)),
            NodeKind::QueryMethod(q) => q.query.as_deref().map(Cow::Borrowed),
            NodeKind::RequestMapping(m) | NodeKind::WebfluxRoute(WebfluxRouteNode { mapping: m, .. })
                if !m.content_types.is_empty() =>
            {
                Some(Cow::Owned(format!("produces: {}", m.content_types.join(", "))))
            }
            NodeKind::Stereotyped(s) => s.hover().map(Cow::Borrowed),
            _ => None,
        }
    }
}

/// Identity hints optionally supplied by the wire payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeHints {
    pub node_id: Option<String>,
    pub project_id: Option<String>,
}

/// Construction-time handle given to children: weak parent plus its path
pub(crate) struct ParentLink {
    pub(crate) node: Weak<Node>,
    pub(crate) path: String,
}

/// A node of the structure tree
#[derive(Debug)]
pub struct Node {
    kind: NodeKind,
    hints: NodeHints,
    id: String,
    children: Vec<Arc<Node>>,
    parent: Weak<Node>,
}

impl Node {
    /// Build a node top-down so children can point back at it
    ///
    /// `children` receives the link for this node and returns the already
    /// decoded child sequence.
    pub(crate) fn assemble(
        kind: NodeKind,
        hints: NodeHints,
        parent: Option<&ParentLink>,
        children: impl FnOnce(&ParentLink) -> Vec<Arc<Node>>,
    ) -> Arc<Node> {
        let parent_path = parent.map(|p| p.path.as_str()).unwrap_or("");
        let label = kind.label();
        let id = match &hints.node_id {
            Some(hint) => hint.clone(),
            None => {
                let location = kind.location();
                let specific =
                    identity::node_specific_id(&label, location.as_deref(), kind.reference());
                identity::join(parent_path, &specific)
            }
        };
        let child_path = identity::join(parent_path, &label);
        drop(label);

        Arc::new_cyclic(|weak| {
            let link = ParentLink {
                node: weak.clone(),
                path: child_path,
            };
            let children = children(&link);
            Node {
                kind,
                hints,
                id,
                children,
                parent: parent.map(|p| p.node.clone()).unwrap_or_default(),
            }
        })
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn tag(&self) -> NodeKindTag {
        self.kind.tag()
    }

    pub fn hints(&self) -> &NodeHints {
        &self.hints
    }

    /// Owned children in display order
    pub fn children(&self) -> &[Arc<Node>] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Parent node, if this node has one and the tree is still alive
    pub fn parent(&self) -> Option<Arc<Node>> {
        self.parent.upgrade()
    }

    /// Key correlating top-level entries across refreshes
    pub fn project_key(&self) -> Option<&str> {
        if let Some(project) = &self.hints.project_id {
            return Some(project);
        }
        match &self.kind {
            NodeKind::Project(p) => Some(&p.name),
            _ => None,
        }
    }

    /// Stable identity: explicit hint, else derived from content and ancestry
    pub fn node_id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> Cow<'_, str> {
        self.kind.label()
    }

    pub fn icon(&self) -> Option<&str> {
        self.kind.icon()
    }

    pub fn location(&self) -> Option<Cow<'_, Location>> {
        self.kind.location()
    }

    pub fn reference(&self) -> Option<&Value> {
        self.kind.reference()
    }

    pub fn hover(&self) -> Option<Cow<'_, str>> {
        self.kind.tooltip()
    }

    /// Where "open" should navigate: the location, else a location-shaped reference
    pub fn navigation_target(&self) -> Option<Location> {
        if let Some(location) = self.location() {
            return Some(location.into_owned());
        }
        self.reference().and_then(Location::from_value)
    }

    /// Depth-first pre-order walk over this node and its descendants
    pub fn walk<'a>(self: &'a Arc<Self>, visit: &mut impl FnMut(&'a Arc<Node>)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// Simple name of a qualified Java type (`com.example.Foo$Bar` -> `Bar`)
pub fn simple_name(fqn: &str) -> &str {
    fqn.rsplit(|c: char| c == '.' || c == '$').next().unwrap_or(fqn)
}

fn last_segment(uri: &str) -> &str {
    uri.trim_end_matches('/').rsplit('/').next().unwrap_or(uri)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
