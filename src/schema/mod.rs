//! # Schema Registry
//!
//! Declarative description of every node kind: its attributes (type,
//! requiredness, default literal, enumeration domain, reference target), the
//! child roles it may contain with their cardinality, and whether it keeps
//! mixed content.
//!
//! The standard registry is built once from the static tables in
//! [`tables`] and shared read-only. Callers that need a different content
//! model (for example mixed content on more kinds, or a mandatory `model`
//! element) clone it and adjust it before handing it to the codec and the
//! validator.

mod kinds;
mod literals;
mod tables;

pub use kinds::NodeKind;
pub use literals::{
    ConfigVersion, CreateConnector, EnableCorrelation, EndpointType, ExhaustedAction,
    InitialState, InitialisationPolicy, PoolExhaustedAction, ThreadingProfileId,
    TransactionAction, UnknownLiteral,
};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element name of the document root.
pub const ROOT_ELEMENT: &str = "mule-configuration";

static STANDARD: Lazy<SchemaRegistry> = Lazy::new(SchemaRegistry::build_standard);

/// Value type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrType {
    Text,
    Bool,
    Integer,
    /// Closed set of literals.
    Enum(&'static [&'static str]),
    /// Whitespace separated list of names.
    Names,
}

impl AttrType {
    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            AttrType::Text => "text".to_string(),
            AttrType::Bool => "boolean".to_string(),
            AttrType::Integer => "integer".to_string(),
            AttrType::Enum(literals) => format!("one of [{}]", literals.join(", ")),
            AttrType::Names => "list of names".to_string(),
        }
    }
}

/// Catalog a reference-bearing attribute points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReferenceKind {
    Endpoint,
    Connector,
    Transformer,
    InterceptorStack,
    Agent,
    EndpointIdentifier,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 6] = [
        ReferenceKind::Endpoint,
        ReferenceKind::Connector,
        ReferenceKind::Transformer,
        ReferenceKind::InterceptorStack,
        ReferenceKind::Agent,
        ReferenceKind::EndpointIdentifier,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Endpoint => "Endpoint",
            ReferenceKind::Connector => "Connector",
            ReferenceKind::Transformer => "Transformer",
            ReferenceKind::InterceptorStack => "InterceptorStack",
            ReferenceKind::Agent => "Agent",
            ReferenceKind::EndpointIdentifier => "EndpointIdentifier",
        }
    }

    /// Location of the catalog below the root: an optional container role
    /// followed by the role of the entries.
    pub fn catalog_location(&self) -> (Option<&'static str>, &'static str) {
        match self {
            ReferenceKind::Endpoint => (Some("global-endpoints"), "endpoint"),
            ReferenceKind::Connector => (None, "connector"),
            ReferenceKind::Transformer => (Some("transformers"), "transformer"),
            ReferenceKind::InterceptorStack => (None, "interceptor-stack"),
            ReferenceKind::Agent => (Some("agents"), "agent"),
            ReferenceKind::EndpointIdentifier => {
                (Some("endpoint-identifiers"), "endpoint-identifier")
            }
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// When a reference-bearing attribute actually names a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefPolicy {
    /// Every value is a catalog name.
    Strict,
    /// Values containing `://` are literal addresses, anything else is a name.
    AddressOrName,
    /// The value is a catalog name only while the given sibling attribute has
    /// no effective value.
    UnlessSet(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefTarget {
    pub kind: ReferenceKind,
    pub policy: RefPolicy,
}

/// Declaration of a single attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    pub name: &'static str,
    pub ty: AttrType,
    pub required: bool,
    /// Schema default, as a document literal.
    pub default: Option<&'static str>,
    pub reference: Option<RefTarget>,
}

impl AttributeSpec {
    pub const fn new(name: &'static str, ty: AttrType) -> Self {
        Self { name, ty, required: false, default: None, reference: None }
    }

    pub const fn text(name: &'static str) -> Self {
        Self::new(name, AttrType::Text)
    }

    pub const fn boolean(name: &'static str, default: &'static str) -> Self {
        Self::new(name, AttrType::Bool).with_default(default)
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, AttrType::Integer)
    }

    pub const fn literal(name: &'static str, literals: &'static [&'static str]) -> Self {
        Self::new(name, AttrType::Enum(literals))
    }

    pub const fn names(name: &'static str) -> Self {
        Self::new(name, AttrType::Names)
    }

    pub const fn required(self) -> Self {
        Self { required: true, ..self }
    }

    pub const fn with_default(self, default: &'static str) -> Self {
        Self { default: Some(default), ..self }
    }

    pub const fn references(self, kind: ReferenceKind) -> Self {
        Self { reference: Some(RefTarget { kind, policy: RefPolicy::Strict }), ..self }
    }

    pub const fn references_with(self, kind: ReferenceKind, policy: RefPolicy) -> Self {
        Self { reference: Some(RefTarget { kind, policy }), ..self }
    }

    pub fn enum_literals(&self) -> Option<&'static [&'static str]> {
        match self.ty {
            AttrType::Enum(literals) => Some(literals),
            _ => None,
        }
    }
}

/// How many children a role may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    /// Exactly one child.
    One,
    /// Zero or one child.
    Optional,
    /// Any number of children, ordered.
    Many,
}

impl Cardinality {
    pub fn allows_many(&self) -> bool {
        matches!(self, Cardinality::Many)
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Cardinality::One)
    }
}

/// Declaration of a child role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildSpec {
    /// Role name, which is also the element name of the child.
    pub role: &'static str,
    pub kind: NodeKind,
    pub cardinality: Cardinality,
}

impl ChildSpec {
    pub const fn optional(role: &'static str, kind: NodeKind) -> Self {
        Self { role, kind, cardinality: Cardinality::Optional }
    }

    pub const fn many(role: &'static str, kind: NodeKind) -> Self {
        Self { role, kind, cardinality: Cardinality::Many }
    }
}

/// Everything the registry knows about one node kind.
#[derive(Debug, Clone)]
pub struct KindSchema {
    pub kind: NodeKind,
    pub attributes: &'static [AttributeSpec],
    pub children: Vec<ChildSpec>,
    pub allows_mixed_content: bool,
    pub has_text_content: bool,
}

impl KindSchema {
    pub fn attribute(&self, name: &str) -> Option<&'static AttributeSpec> {
        self.attributes.iter().find(|spec| spec.name == name)
    }

    pub fn child(&self, role: &str) -> Option<&ChildSpec> {
        self.children.iter().find(|spec| spec.role == role)
    }
}

/// Per-kind schema lookup table.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    kinds: Vec<KindSchema>,
}

impl SchemaRegistry {
    /// The registry describing the standard document format.
    pub fn standard() -> &'static SchemaRegistry {
        &STANDARD
    }

    fn build_standard() -> Self {
        let kinds = NodeKind::ALL.iter().map(|kind| tables::kind_schema(*kind)).collect();
        Self { kinds }
    }

    /// Schema of a kind. Every kind is present in every registry.
    pub fn schema(&self, kind: NodeKind) -> &KindSchema {
        &self.kinds[kind.index()]
    }

    pub fn attribute(&self, kind: NodeKind, name: &str) -> Option<&'static AttributeSpec> {
        self.schema(kind).attribute(name)
    }

    pub fn child(&self, kind: NodeKind, role: &str) -> Option<&ChildSpec> {
        self.schema(kind).child(role)
    }

    pub fn allows_mixed_content(&self, kind: NodeKind) -> bool {
        self.schema(kind).allows_mixed_content
    }

    /// Toggle mixed-content preservation for a kind.
    pub fn with_mixed_content(mut self, kind: NodeKind, allowed: bool) -> Self {
        self.kinds[kind.index()].allows_mixed_content = allowed;
        self
    }

    /// Override the cardinality of a declared role. Unknown roles are left
    /// untouched.
    pub fn with_cardinality(mut self, kind: NodeKind, role: &str, cardinality: Cardinality) -> Self {
        if let Some(spec) =
            self.kinds[kind.index()].children.iter_mut().find(|spec| spec.role == role)
        {
            spec.cardinality = cardinality;
        }
        self
    }

    /// Every attribute declared with a reference target, with its owner kind.
    pub fn reference_attributes(&self) -> impl Iterator<Item = (NodeKind, &'static AttributeSpec)> + '_ {
        self.kinds.iter().flat_map(|schema| {
            schema
                .attributes
                .iter()
                .filter(|spec| spec.reference.is_some())
                .map(move |spec| (schema.kind, spec))
        })
    }
}
