//! Reference resolution against the global catalogs
//!
//! Endpoints, connectors, transformers, interceptor stacks, agents and
//! endpoint identifiers may be declared once at the top level and referred to
//! by name. The document keeps an index from name to catalog position, built
//! when the document is built; resolving is a single hash lookup and hands
//! back a shared borrow of the catalog entry.

use super::node::Node;
use crate::schema::{AttributeSpec, NodeKind, RefPolicy, ReferenceKind};
use std::collections::HashMap;

/// Name to position index of every catalog.
pub(crate) type CatalogIndex = HashMap<ReferenceKind, HashMap<String, usize>>;

/// A name that does not match any catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unresolved {kind} reference '{name}'")]
pub struct UnresolvedReference {
    pub kind: ReferenceKind,
    pub name: String,
}

/// Entries of one catalog, in document order.
pub fn catalog(root: &Node, kind: ReferenceKind) -> &[Node] {
    let (container, role) = kind.catalog_location();
    match container {
        Some(container) => root.child(container).map(|node| node.children(role)).unwrap_or(&[]),
        None => root.children(role),
    }
}

/// Index every catalog by entry name. The first declaration of a name wins.
pub(crate) fn build_index(root: &Node) -> CatalogIndex {
    ReferenceKind::ALL
        .iter()
        .map(|kind| {
            let mut names = HashMap::new();
            for (position, entry) in catalog(root, *kind).iter().enumerate() {
                if let Some(name) = entry.get_str("name") {
                    names.entry(name.to_string()).or_insert(position);
                }
            }
            (*kind, names)
        })
        .collect()
}

/// A catalog name carried by a reference-bearing attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedReference<'n> {
    pub attribute: &'static str,
    pub kind: ReferenceKind,
    pub name: &'n str,
}

/// Catalog names referenced by a node's attributes, honouring each
/// attribute's reference policy. Values containing `://` under the
/// address-or-name policy are literal addresses and are skipped.
pub fn references_of(node: &Node) -> Vec<NamedReference<'_>> {
    let mut references = Vec::new();
    for slot in node.attributes() {
        let spec: &'static AttributeSpec = slot.spec();
        let (Some(target), Some(value)) = (spec.reference, slot.effective()) else {
            continue;
        };

        let applies = match target.policy {
            RefPolicy::Strict => true,
            RefPolicy::AddressOrName => value.as_str().is_some_and(|text| !is_address(text)),
            RefPolicy::UnlessSet(sibling) => node.get(sibling).is_none(),
        };
        if !applies {
            continue;
        }

        if let Some(names) = value.as_names() {
            references.extend(names.iter().map(|name| NamedReference {
                attribute: spec.name,
                kind: target.kind,
                name: name.as_str(),
            }));
        } else if let Some(name) = value.as_str() {
            references.push(NamedReference { attribute: spec.name, kind: target.kind, name });
        }
    }
    references
}

/// Whether an endpoint value is a literal address rather than a catalog name.
pub fn is_address(value: &str) -> bool {
    value.contains("://")
}

/// How an endpoint node obtains its definition.
#[derive(Debug, Clone, Copy)]
pub enum EndpointResolution<'a> {
    /// The node defines the endpoint itself.
    Inline(&'a Node),
    /// The node refers to a catalog entry (through `ref` or a
    /// `global-endpoint` element) and may carry local overrides.
    Catalog { reference: &'a Node, entry: &'a Node },
}

impl<'a> EndpointResolution<'a> {
    /// Node holding the endpoint definition.
    pub fn definition(&self) -> &'a Node {
        match self {
            EndpointResolution::Inline(node) => node,
            EndpointResolution::Catalog { entry, .. } => entry,
        }
    }

    /// Node as written at the point of use.
    pub fn local(&self) -> &'a Node {
        match self {
            EndpointResolution::Inline(node) => node,
            EndpointResolution::Catalog { reference, .. } => reference,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, EndpointResolution::Catalog { .. })
    }

    /// Effective string attribute: a local override when the reference sets
    /// it explicitly, otherwise the definition's value.
    pub fn get_str(&self, name: &str) -> Option<&'a str> {
        let local = self.local();
        if local.is_set(name) {
            return local.get_str(name);
        }
        self.definition().get_str(name)
    }

    /// Effective child: local override first, then the definition's.
    pub fn child(&self, role: &str) -> Option<&'a Node> {
        self.local().child(role).or_else(|| self.definition().child(role))
    }
}

/// Target of an attribute that accepts either an address or an endpoint name.
#[derive(Debug, Clone, Copy)]
pub enum EndpointTarget<'a> {
    Address(&'a str),
    Catalog(&'a Node),
}

/// Read-only view over the catalogs of a document.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'a> {
    root: &'a Node,
    index: &'a CatalogIndex,
}

impl<'a> ReferenceResolver<'a> {
    pub(crate) fn new(root: &'a Node, index: &'a CatalogIndex) -> Self {
        Self { root, index }
    }

    /// Catalog entry named `name`.
    pub fn resolve(&self, kind: ReferenceKind, name: &str) -> Result<&'a Node, UnresolvedReference> {
        self.index
            .get(&kind)
            .and_then(|names| names.get(name))
            .and_then(|position| catalog(self.root, kind).get(*position))
            .ok_or_else(|| UnresolvedReference { kind, name: name.to_string() })
    }

    pub fn contains(&self, kind: ReferenceKind, name: &str) -> bool {
        self.index.get(&kind).is_some_and(|names| names.contains_key(name))
    }

    /// Entries of one catalog, in document order.
    pub fn catalog(&self, kind: ReferenceKind) -> &'a [Node] {
        catalog(self.root, kind)
    }

    /// Follow an `endpoint ref="…"` or `global-endpoint name="…"` to its
    /// catalog entry. Any other node is its own definition.
    pub fn resolve_endpoint(&self, node: &'a Node) -> Result<EndpointResolution<'a>, UnresolvedReference> {
        let name = match node.kind() {
            NodeKind::Endpoint => node.get_str("ref"),
            NodeKind::GlobalEndpoint => node.get_str("name"),
            _ => None,
        };
        match name {
            Some(name) => {
                let entry = self.resolve(ReferenceKind::Endpoint, name)?;
                Ok(EndpointResolution::Catalog { reference: node, entry })
            }
            None => Ok(EndpointResolution::Inline(node)),
        }
    }

    /// Resolve a value that is either a literal address or an endpoint name.
    pub fn resolve_endpoint_target(&self, value: &'a str) -> Result<EndpointTarget<'a>, UnresolvedReference> {
        if is_address(value) {
            Ok(EndpointTarget::Address(value))
        } else {
            self.resolve(ReferenceKind::Endpoint, value).map(EndpointTarget::Catalog)
        }
    }

    /// Resolve every transformer in a names attribute, in chain order.
    pub fn transformer_chain(&self, names: &[String]) -> Result<Vec<&'a Node>, UnresolvedReference> {
        names.iter().map(|name| self.resolve(ReferenceKind::Transformer, name)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(kind: NodeKind, name: &str) -> Node {
        Node::standard(kind).with("name", name).expect("name")
    }

    fn root_with_catalog() -> Node {
        let mut root = Node::standard(NodeKind::MuleConfiguration);
        let mut endpoints = Node::standard(NodeKind::GlobalEndpoints);
        for (name, address) in [("orders", "jms://orders"), ("audit", "vm://audit"), ("orders", "jms://dup")] {
            let entry = named(NodeKind::CatalogEndpoint, name).with("address", address).expect("address");
            endpoints.push_child("endpoint", entry).expect("entry");
        }
        root.push_child("global-endpoints", endpoints).expect("container");
        root.push_child("connector", named(NodeKind::Connector, "jmsConnector")).expect("connector");
        root
    }

    #[test]
    fn first_declaration_wins() {
        let root = root_with_catalog();
        let index = build_index(&root);
        let resolver = ReferenceResolver::new(&root, &index);

        let entry = resolver.resolve(ReferenceKind::Endpoint, "orders").expect("resolves");
        assert_eq!(entry.get_str("address"), Some("jms://orders"));
        assert!(resolver.contains(ReferenceKind::Connector, "jmsConnector"));
        assert_eq!(resolver.catalog(ReferenceKind::Endpoint).len(), 3);
    }

    #[test]
    fn missing_names_are_reported_with_kind() {
        let root = root_with_catalog();
        let index = build_index(&root);
        let resolver = ReferenceResolver::new(&root, &index);

        let err = resolver.resolve(ReferenceKind::Transformer, "XmlToDom").unwrap_err();
        assert_eq!(err, UnresolvedReference { kind: ReferenceKind::Transformer, name: "XmlToDom".to_string() });
        assert_eq!(err.to_string(), "Unresolved Transformer reference 'XmlToDom'");
    }

    #[test]
    fn endpoint_forms_resolve_to_the_catalog_entry() {
        let root = root_with_catalog();
        let index = build_index(&root);
        let resolver = ReferenceResolver::new(&root, &index);

        let by_ref = Node::standard(NodeKind::Endpoint).with("ref", "audit").expect("ref");
        let resolution = resolver.resolve_endpoint(&by_ref).expect("resolves");
        assert!(resolution.is_reference());
        assert_eq!(resolution.get_str("address"), Some("vm://audit"));

        let global = named(NodeKind::GlobalEndpoint, "audit").with("address", "vm://override").expect("address");
        let resolution = resolver.resolve_endpoint(&global).expect("resolves");
        assert_eq!(resolution.get_str("address"), Some("vm://override"));
        assert_eq!(resolution.definition().get_str("address"), Some("vm://audit"));

        let inline = Node::standard(NodeKind::Endpoint).with("address", "tcp://localhost:60504").expect("address");
        assert!(!resolver.resolve_endpoint(&inline).expect("inline").is_reference());
    }

    #[test]
    fn address_or_name_policy() {
        let root = root_with_catalog();
        let index = build_index(&root);
        let resolver = ReferenceResolver::new(&root, &index);

        assert!(matches!(resolver.resolve_endpoint_target("vm://queue"), Ok(EndpointTarget::Address("vm://queue"))));
        assert!(matches!(resolver.resolve_endpoint_target("orders"), Ok(EndpointTarget::Catalog(_))));
        assert!(resolver.resolve_endpoint_target("missing").is_err());

        let descriptor = Node::standard(NodeKind::MuleDescriptor)
            .with("inboundEndpoint", "vm://in")
            .and_then(|d| d.with("outboundEndpoint", "orders"))
            .and_then(|d| d.with("inboundTransformer", "A B"))
            .expect("descriptor");
        let references: Vec<(&str, &str)> =
            references_of(&descriptor).iter().map(|r| (r.attribute, r.name)).collect();
        assert_eq!(references, vec![("outboundEndpoint", "orders"), ("inboundTransformer", "A"), ("inboundTransformer", "B")]);
    }

    #[test]
    fn interceptor_name_is_a_reference_only_without_class_name() {
        let by_stack = named(NodeKind::Interceptor, "default");
        assert_eq!(references_of(&by_stack).len(), 1);

        let by_class = by_stack.with("className", "org.mule.interceptors.LoggingInterceptor").expect("class");
        assert!(references_of(&by_class).is_empty());
    }
}
