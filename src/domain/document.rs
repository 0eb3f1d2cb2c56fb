//! Configuration documents
//!
//! A [`ConfigurationDocument`] is the immutable result of parsing or
//! building a `mule-configuration`: the prolog, the root node and the catalog
//! index used for reference resolution. Edits go through a
//! [`DocumentBuilder`], which produces a new document.

use super::attribute::AttributeValue;
use super::descriptor::{DescriptorView, ModelView};
use super::node::Node;
use super::profile::EnvironmentView;
use super::properties::PropertyMap;
use super::resolver::{build_index, catalog, CatalogIndex, ReferenceResolver};
use crate::errors::{MuleConfigError, Result};
use crate::schema::{ConfigVersion, NodeKind, ReferenceKind, SchemaRegistry};
use serde::Serialize;

/// Contents of the `<?xml …?>` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XmlDeclaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

impl Default for XmlDeclaration {
    fn default() -> Self {
        Self { version: "1.0".to_string(), encoding: Some("UTF-8".to_string()), standalone: None }
    }
}

/// Item preceding the root element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PrologItem {
    /// Body of a `<!DOCTYPE …>` declaration, without the keyword.
    Doctype(String),
    Comment(String),
}

/// Everything before the root element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Prolog {
    pub declaration: Option<XmlDeclaration>,
    pub items: Vec<PrologItem>,
}

impl Prolog {
    pub fn doctype(&self) -> Option<&str> {
        self.items.iter().find_map(|item| match item {
            PrologItem::Doctype(doctype) => Some(doctype.as_str()),
            _ => None,
        })
    }

    pub fn comments(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            PrologItem::Comment(comment) => Some(comment.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ConfigurationDocument {
    prolog: Prolog,
    root: Node,
    index: CatalogIndex,
}

impl PartialEq for ConfigurationDocument {
    fn eq(&self, other: &Self) -> bool {
        self.prolog == other.prolog && self.root == other.root
    }
}

impl ConfigurationDocument {
    pub(crate) fn from_parts(prolog: Prolog, root: Node) -> Self {
        let index = build_index(&root);
        Self { prolog, root, index }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn prolog(&self) -> &Prolog {
        &self.prolog
    }

    pub fn id(&self) -> Option<&str> {
        self.root.get_str("id")
    }

    /// Declared schema version. `None` when absent or not a known version.
    pub fn version(&self) -> Option<ConfigVersion> {
        self.root.get_str("version").and_then(|literal| literal.parse().ok())
    }

    pub fn description(&self) -> Option<&str> {
        self.root.child("description").and_then(Node::text)
    }

    pub fn resolver(&self) -> ReferenceResolver<'_> {
        ReferenceResolver::new(&self.root, &self.index)
    }

    /// Entries of one catalog, in document order.
    pub fn catalog(&self, kind: ReferenceKind) -> &[Node] {
        catalog(&self.root, kind)
    }

    fn lookup(&self, kind: ReferenceKind, name: &str) -> Option<&Node> {
        self.resolver().resolve(kind, name).ok()
    }

    pub fn global_endpoint(&self, name: &str) -> Option<&Node> {
        self.lookup(ReferenceKind::Endpoint, name)
    }

    pub fn connector(&self, name: &str) -> Option<&Node> {
        self.lookup(ReferenceKind::Connector, name)
    }

    pub fn transformer(&self, name: &str) -> Option<&Node> {
        self.lookup(ReferenceKind::Transformer, name)
    }

    pub fn interceptor_stack(&self, name: &str) -> Option<&Node> {
        self.lookup(ReferenceKind::InterceptorStack, name)
    }

    pub fn agent(&self, name: &str) -> Option<&Node> {
        self.lookup(ReferenceKind::Agent, name)
    }

    /// Value of a declared endpoint identifier.
    pub fn endpoint_identifier(&self, name: &str) -> Option<&str> {
        self.lookup(ReferenceKind::EndpointIdentifier, name).and_then(|node| node.get_str("value"))
    }

    pub fn model(&self) -> Option<ModelView<'_>> {
        self.root.child("model").map(|node| ModelView::new(node, self))
    }

    /// Every descriptor: those of the model first, then root-level ones.
    pub fn descriptors(&self) -> Vec<DescriptorView<'_>> {
        let in_model = self.root.child("model").map(|model| model.children("mule-descriptor")).unwrap_or(&[]);
        in_model
            .iter()
            .chain(self.root.children("mule-descriptor"))
            .map(|node| DescriptorView::new(node, self))
            .collect()
    }

    pub fn descriptor(&self, name: &str) -> Option<DescriptorView<'_>> {
        self.descriptors().into_iter().find(|descriptor| descriptor.name() == Some(name))
    }

    /// The `mule-environment-properties` element.
    pub fn environment(&self) -> Option<EnvironmentView<'_>> {
        self.root.child("mule-environment-properties").map(EnvironmentView::new)
    }

    /// Flattened `environment-properties`.
    pub fn environment_properties(&self) -> PropertyMap {
        self.root.child("environment-properties").map(PropertyMap::from_node).unwrap_or_default()
    }

    /// Start an edit from a copy of this document.
    pub fn to_builder(&self) -> DocumentBuilder<'static> {
        self.to_builder_with(SchemaRegistry::standard())
    }

    pub fn to_builder_with<'r>(&self, registry: &'r SchemaRegistry) -> DocumentBuilder<'r> {
        DocumentBuilder { registry, prolog: self.prolog.clone(), root: self.root.clone() }
    }
}

/// Mutable staging area for a document.
#[derive(Debug, Clone)]
pub struct DocumentBuilder<'r> {
    registry: &'r SchemaRegistry,
    prolog: Prolog,
    root: Node,
}

impl DocumentBuilder<'static> {
    /// Builder over the standard registry.
    pub fn standard() -> Self {
        Self::new(SchemaRegistry::standard())
    }
}

impl<'r> DocumentBuilder<'r> {
    /// Empty version 1.0 document with a default XML declaration.
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        let mut root = Node::new(NodeKind::MuleConfiguration, registry);
        if let Ok(slot) = root.attribute_mut("version") {
            slot.set_unchecked(AttributeValue::literal(ConfigVersion::V1.as_str()));
        }
        Self { registry, prolog: Prolog { declaration: Some(XmlDeclaration::default()), items: Vec::new() }, root }
    }

    /// Builder around an existing root node.
    pub fn from_root(registry: &'r SchemaRegistry, root: Node) -> Result<Self> {
        if root.kind() != NodeKind::MuleConfiguration {
            return Err(MuleConfigError::unknown_element("#document", root.kind().as_str()));
        }
        Ok(Self { registry, prolog: Prolog::default(), root })
    }

    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    pub fn prolog_mut(&mut self) -> &mut Prolog {
        &mut self.prolog
    }

    pub fn with_id(mut self, id: &str) -> Result<Self> {
        self.root.set_literal("id", id)?;
        Ok(self)
    }

    /// Create an empty node of `kind` typed by this builder's registry.
    pub fn node(&self, kind: NodeKind) -> Node {
        Node::new(kind, self.registry)
    }

    /// Append a top-level child.
    pub fn push(&mut self, role: &str, node: Node) -> Result<&mut Node> {
        self.root.push_child(role, node)
    }

    /// Add an entry to a global catalog, creating its container on first use.
    pub fn add_to_catalog(&mut self, kind: ReferenceKind, entry: Node) -> Result<&mut Node> {
        let (container, role) = kind.catalog_location();
        let Some(container) = container else {
            return self.root.push_child(role, entry);
        };

        if self.root.child(container).is_none() {
            let container_kind = self
                .registry
                .child(NodeKind::MuleConfiguration, container)
                .map(|spec| spec.kind)
                .ok_or_else(|| MuleConfigError::disallowed_child(NodeKind::MuleConfiguration, container))?;
            self.root.push_child(container, Node::new(container_kind, self.registry))?;
        }
        let parent = self
            .root
            .child_mut(container)
            .ok_or_else(|| MuleConfigError::disallowed_child(NodeKind::MuleConfiguration, container))?;
        parent.push_child(role, entry)
    }

    /// The `model` element, created on first use.
    pub fn model_mut(&mut self) -> Result<&mut Node> {
        if self.root.child("model").is_none() {
            self.root.push_child("model", Node::new(NodeKind::Model, self.registry))?;
        }
        self.root.child_mut("model").ok_or_else(|| MuleConfigError::disallowed_child(NodeKind::MuleConfiguration, "model"))
    }

    /// Freeze the builder into a document.
    pub fn build(self) -> ConfigurationDocument {
        ConfigurationDocument::from_parts(self.prolog, self.root)
    }
}

impl Default for DocumentBuilder<'static> {
    fn default() -> Self {
        Self::standard()
    }
}
