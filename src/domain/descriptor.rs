//! Model and component descriptors

use super::document::ConfigurationDocument;
use super::node::Node;
use super::profile::{PoolingProfileView, QueueProfileView, ThreadingProfileView};
use super::properties::PropertyMap;
use super::resolver::{EndpointTarget, UnresolvedReference};
use super::router::RouterView;
use super::typed;
use crate::schema::{InitialState, ReferenceKind};

/// The `model` element holding the component descriptors.
#[derive(Debug, Clone, Copy)]
pub struct ModelView<'a> {
    node: &'a Node,
    document: &'a ConfigurationDocument,
}

impl<'a> ModelView<'a> {
    pub fn new(node: &'a Node, document: &'a ConfigurationDocument) -> Self {
        Self { node, document }
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn name(&self) -> Option<&'a str> {
        self.node.get_str("name")
    }

    /// Model implementation type, `seda` unless stated otherwise.
    pub fn model_type(&self) -> Option<&'a str> {
        self.node.get_str("type")
    }

    pub fn class_name(&self) -> Option<&'a str> {
        self.node.get_str("className")
    }

    pub fn entry_point_resolver(&self) -> Option<&'a str> {
        self.node.child("entry-point-resolver").and_then(|node| node.get_str("className"))
    }

    pub fn exception_strategy(&self) -> Option<&'a str> {
        self.node.child("exception-strategy").and_then(|node| node.get_str("className"))
    }

    pub fn descriptors(&self) -> Vec<DescriptorView<'a>> {
        self.node
            .children("mule-descriptor")
            .iter()
            .map(|node| DescriptorView::new(node, self.document))
            .collect()
    }
}

/// Interceptor attached to a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterceptorRef<'a> {
    Class(&'a str),
    Stack(&'a str),
}

/// A `mule-descriptor`: one component with its routing configuration.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorView<'a> {
    node: &'a Node,
    document: &'a ConfigurationDocument,
}

impl<'a> DescriptorView<'a> {
    pub fn new(node: &'a Node, document: &'a ConfigurationDocument) -> Self {
        Self { node, document }
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn name(&self) -> Option<&'a str> {
        self.node.get_str("name")
    }

    pub fn implementation(&self) -> Option<&'a str> {
        self.node.get_str("implementation")
    }

    pub fn version(&self) -> Option<&'a str> {
        self.node.get_str("version")
    }

    pub fn is_singleton(&self) -> bool {
        self.node.get_bool("singleton").unwrap_or(false)
    }

    pub fn is_container_managed(&self) -> bool {
        self.node.get_bool("containerManaged").unwrap_or(true)
    }

    pub fn initial_state(&self) -> InitialState {
        typed(self.node, "initialState").unwrap_or(InitialState::Started)
    }

    fn router(&self, role: &str) -> Option<RouterView<'a>> {
        self.node.child(role).and_then(|node| RouterView::new(node, self.document))
    }

    pub fn inbound_router(&self) -> Option<RouterView<'a>> {
        self.router("inbound-router")
    }

    pub fn outbound_router(&self) -> Option<RouterView<'a>> {
        self.router("outbound-router")
    }

    pub fn response_router(&self) -> Option<RouterView<'a>> {
        self.router("response-router")
    }

    fn endpoint_attribute(&self, attribute: &str) -> Option<Result<EndpointTarget<'a>, UnresolvedReference>> {
        let value = self.node.get_str(attribute)?;
        Some(self.document.resolver().resolve_endpoint_target(value))
    }

    /// Shorthand inbound endpoint: a literal address or a catalog name.
    pub fn inbound_endpoint(&self) -> Option<Result<EndpointTarget<'a>, UnresolvedReference>> {
        self.endpoint_attribute("inboundEndpoint")
    }

    pub fn outbound_endpoint(&self) -> Option<Result<EndpointTarget<'a>, UnresolvedReference>> {
        self.endpoint_attribute("outboundEndpoint")
    }

    pub fn inbound_transformers(&self) -> &'a [String] {
        self.node.get_names("inboundTransformer")
    }

    pub fn outbound_transformers(&self) -> &'a [String] {
        self.node.get_names("outboundTransformer")
    }

    pub fn response_transformers(&self) -> &'a [String] {
        self.node.get_names("responseTransformer")
    }

    pub fn interceptors(&self) -> Vec<InterceptorRef<'a>> {
        self.node
            .children("interceptor")
            .iter()
            .filter_map(|node| match (node.get_str("className"), node.get_str("name")) {
                (Some(class_name), _) => Some(InterceptorRef::Class(class_name)),
                (None, Some(stack)) => Some(InterceptorRef::Stack(stack)),
                (None, None) => None,
            })
            .collect()
    }

    /// Interceptor classes in invocation order, with stacks expanded.
    pub fn interceptor_classes(&self) -> Result<Vec<&'a str>, UnresolvedReference> {
        let resolver = self.document.resolver();
        let mut classes = Vec::new();
        for interceptor in self.interceptors() {
            match interceptor {
                InterceptorRef::Class(class_name) => classes.push(class_name),
                InterceptorRef::Stack(name) => {
                    let stack = resolver.resolve(ReferenceKind::InterceptorStack, name)?;
                    classes.extend(
                        stack.children("interceptor").iter().filter_map(|node| node.get_str("className")),
                    );
                }
            }
        }
        Ok(classes)
    }

    pub fn threading_profile(&self) -> Option<ThreadingProfileView<'a>> {
        self.node.child("threading-profile").map(ThreadingProfileView::new)
    }

    pub fn pooling_profile(&self) -> Option<PoolingProfileView<'a>> {
        self.node.child("pooling-profile").map(PoolingProfileView::new)
    }

    pub fn queue_profile(&self) -> Option<QueueProfileView<'a>> {
        self.node.child("queue-profile").map(QueueProfileView::new)
    }

    pub fn exception_strategy(&self) -> Option<&'a str> {
        self.node.child("exception-strategy").and_then(|node| node.get_str("className"))
    }

    pub fn properties(&self) -> PropertyMap {
        PropertyMap::of(self.node)
    }
}
