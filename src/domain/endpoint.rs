//! Endpoint Views
//!
//! Endpoints appear in three shapes: an inline `endpoint` carrying its own
//! address, an `endpoint ref="…"` pointing into the global catalog, and a
//! `global-endpoint name="…"` element which may override the catalog entry's
//! transformers, filter and properties. [`EndpointView`] hides the
//! difference.

use super::filter::{FilterCompositionError, FilterExpression};
use super::node::Node;
use super::properties::PropertyMap;
use super::resolver::{EndpointResolution, ReferenceResolver, UnresolvedReference};
use super::typed;
use crate::schema::{CreateConnector, EndpointType, NodeKind, TransactionAction};
use serde::Serialize;
use std::fmt;

/// Syntactic form of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointShape {
    Inline,
    Reference,
    GlobalReference,
}

impl EndpointShape {
    pub fn of(node: &Node) -> Self {
        match node.kind() {
            NodeKind::GlobalEndpoint => EndpointShape::GlobalReference,
            NodeKind::Endpoint if node.get_str("ref").is_some() => EndpointShape::Reference,
            _ => EndpointShape::Inline,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointShape::Inline => "inline",
            EndpointShape::Reference => "reference",
            EndpointShape::GlobalReference => "global_reference",
        }
    }
}

impl fmt::Display for EndpointShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl EndpointType {
    pub fn can_receive(&self) -> bool {
        matches!(self, EndpointType::SenderAndReceiver | EndpointType::Receiver)
    }

    pub fn can_send(&self) -> bool {
        matches!(self, EndpointType::SenderAndReceiver | EndpointType::Sender)
    }
}

/// An endpoint with its catalog reference (if any) resolved.
#[derive(Debug, Clone, Copy)]
pub struct EndpointView<'a> {
    resolution: EndpointResolution<'a>,
}

impl<'a> EndpointView<'a> {
    pub fn resolve(node: &'a Node, resolver: &ReferenceResolver<'a>) -> Result<Self, UnresolvedReference> {
        resolver.resolve_endpoint(node).map(|resolution| Self { resolution })
    }

    pub fn shape(&self) -> EndpointShape {
        EndpointShape::of(self.resolution.local())
    }

    /// Node as written at the point of use.
    pub fn node(&self) -> &'a Node {
        self.resolution.local()
    }

    /// Catalog entry for references, the node itself otherwise.
    pub fn definition(&self) -> &'a Node {
        self.resolution.definition()
    }

    pub fn name(&self) -> Option<&'a str> {
        self.resolution.get_str("name")
    }

    pub fn address(&self) -> Option<&'a str> {
        self.resolution.get_str("address")
    }

    pub fn connector(&self) -> Option<&'a str> {
        self.definition().get_str("connector")
    }

    /// Direction(s) the endpoint may be used in.
    pub fn endpoint_type(&self) -> EndpointType {
        typed(self.definition(), "type").unwrap_or(EndpointType::SenderAndReceiver)
    }

    pub fn create_connector(&self) -> CreateConnector {
        typed(self.definition(), "createConnector").unwrap_or(CreateConnector::GetOrCreate)
    }

    fn names(&self, attribute: &str) -> &'a [String] {
        let local = self.resolution.local();
        if local.is_set(attribute) {
            local.get_names(attribute)
        } else {
            self.definition().get_names(attribute)
        }
    }

    /// Transformer chain applied to messages, local override first.
    pub fn transformers(&self) -> &'a [String] {
        self.names("transformers")
    }

    pub fn response_transformers(&self) -> &'a [String] {
        self.names("responseTransformers")
    }

    fn flag(&self, attribute: &str) -> bool {
        let local = self.resolution.local();
        let source = if local.is_set(attribute) { local } else { self.definition() };
        source.get_bool(attribute).unwrap_or(false)
    }

    pub fn is_synchronous(&self) -> bool {
        self.flag("synchronous")
    }

    pub fn is_remote_sync(&self) -> bool {
        self.flag("remoteSync")
    }

    pub fn remote_sync_timeout(&self) -> Option<i64> {
        let local = self.resolution.local();
        local.get_integer("remoteSyncTimeout").or_else(|| self.definition().get_integer("remoteSyncTimeout"))
    }

    /// Filter expression guarding the endpoint, if any.
    pub fn filter(&self) -> Option<Result<FilterExpression, FilterCompositionError>> {
        self.resolution.child("filter").map(FilterExpression::from_node)
    }

    pub fn security_filter(&self) -> Option<&'a str> {
        self.resolution.child("security-filter").and_then(|node| node.get_str("className"))
    }

    pub fn transaction_action(&self) -> Option<TransactionAction> {
        self.resolution.child("transaction").and_then(|node| typed(node, "action"))
    }

    /// Catalog properties overlaid with local ones.
    pub fn properties(&self) -> PropertyMap {
        let mut properties = PropertyMap::of(self.definition());
        if self.resolution.is_reference() {
            for (name, value) in PropertyMap::of(self.resolution.local()).iter() {
                properties.insert(name, value.clone());
            }
        }
        properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentBuilder, PropertyValue};
    use crate::schema::ReferenceKind;

    fn document() -> crate::domain::ConfigurationDocument {
        let mut builder = DocumentBuilder::standard();
        let mut entry = Node::standard(NodeKind::CatalogEndpoint)
            .with("name", "Orders")
            .and_then(|n| n.with("address", "jms://orders"))
            .and_then(|n| n.with("transformers", "JmsToObject"))
            .and_then(|n| n.with("type", "receiver"))
            .expect("entry");
        let mut properties = Node::standard(NodeKind::Properties);
        for (name, value) in [("priority", "4"), ("durable", "true")] {
            let property = Node::standard(NodeKind::Property)
                .with("name", name)
                .and_then(|p| p.with("value", value))
                .expect("property");
            properties.push_child("property", property).expect("property");
        }
        entry.push_child("properties", properties).expect("properties");
        builder.add_to_catalog(ReferenceKind::Endpoint, entry).expect("catalog");
        builder.build()
    }

    #[test]
    fn inline_endpoint_reads_its_own_attributes() {
        let doc = document();
        let node = Node::standard(NodeKind::Endpoint).with("address", "vm://in").expect("address");
        let view = EndpointView::resolve(&node, &doc.resolver()).expect("inline");

        assert_eq!(view.shape(), EndpointShape::Inline);
        assert_eq!(view.address(), Some("vm://in"));
        assert_eq!(view.endpoint_type(), EndpointType::SenderAndReceiver);
        assert_eq!(view.create_connector(), CreateConnector::GetOrCreate);
        assert!(view.transformers().is_empty());
        assert!(!view.is_synchronous());
    }

    #[test]
    fn reference_reads_through_to_catalog() {
        let doc = document();
        let node = Node::standard(NodeKind::Endpoint).with("ref", "Orders").expect("ref");
        let view = EndpointView::resolve(&node, &doc.resolver()).expect("resolves");

        assert_eq!(view.shape(), EndpointShape::Reference);
        assert_eq!(view.address(), Some("jms://orders"));
        assert_eq!(view.transformers(), ["JmsToObject".to_string()]);
        assert!(view.endpoint_type().can_receive());
        assert!(!view.endpoint_type().can_send());
    }

    #[test]
    fn global_reference_overrides_locally() {
        let doc = document();
        let mut node = Node::standard(NodeKind::GlobalEndpoint)
            .with("name", "Orders")
            .and_then(|n| n.with("transformers", "JmsToString StringToOrder"))
            .expect("global endpoint");
        let mut properties = Node::standard(NodeKind::Properties);
        let property = Node::standard(NodeKind::Property)
            .with("name", "priority")
            .and_then(|p| p.with("value", "9"))
            .expect("property");
        properties.push_child("property", property).expect("property");
        node.push_child("properties", properties).expect("properties");

        let view = EndpointView::resolve(&node, &doc.resolver()).expect("resolves");
        assert_eq!(view.shape(), EndpointShape::GlobalReference);
        assert_eq!(view.transformers().len(), 2);

        let merged = view.properties();
        assert_eq!(merged.get("priority"), Some(&PropertyValue::Value { value: "9".to_string() }));
        assert_eq!(merged.get_str("durable"), Some("true"));

        let entry = doc.global_endpoint("Orders").expect("catalog entry");
        assert_eq!(PropertyMap::of(entry).get_str("priority"), Some("4"));
    }

    #[test]
    fn unresolved_reference_is_an_error() {
        let doc = document();
        let node = Node::standard(NodeKind::Endpoint).with("ref", "Missing").expect("ref");
        let err = EndpointView::resolve(&node, &doc.resolver()).unwrap_err();
        assert_eq!(err.name, "Missing");
    }
}
