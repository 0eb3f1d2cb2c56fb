//! Node kind discriminants
//!
//! Every element of a configuration document is typed by exactly one
//! [`NodeKind`]. Several element names may share a kind (for example
//! `filter`, `left-filter` and `right-filter` are all [`NodeKind::Filter`]);
//! the element name of a node is the role it occupies in its parent.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    MuleConfiguration,
    Description,
    MuleEnvironmentProperties,
    ThreadingProfile,
    PoolingProfile,
    QueueProfile,
    /// Any element that only names an implementation class (strategies,
    /// factories, resolvers).
    ClassDefinition,
    /// External object container that components can be looked up in.
    ContainerContext,
    SecurityManager,
    SecurityProvider,
    EncryptionStrategy,
    TransactionManager,
    Agents,
    Agent,
    Connector,
    ExceptionStrategy,
    EndpointIdentifiers,
    EndpointIdentifier,
    Transformers,
    Transformer,
    GlobalEndpoints,
    /// Endpoint declared inside `global-endpoints`. Has no `ref` attribute.
    CatalogEndpoint,
    /// Endpoint declared inline or referencing the catalog through `ref`.
    Endpoint,
    /// `global-endpoint` element referencing the catalog by `name`.
    GlobalEndpoint,
    Transaction,
    Constraint,
    Filter,
    SecurityFilter,
    InterceptorStack,
    /// Interceptor declared inside an interceptor stack. Cannot reference
    /// another stack.
    StackInterceptor,
    /// Interceptor attached to a descriptor, either by class or by stack name.
    Interceptor,
    Model,
    MuleDescriptor,
    InboundRouter,
    OutboundRouter,
    ResponseRouter,
    Router,
    ReplyTo,
    CatchAllStrategy,
    Properties,
    Property,
    TextProperty,
    SystemProperty,
    FactoryProperty,
    FileProperties,
    MapProperty,
    ListProperty,
    ListEntry,
}

impl NodeKind {
    /// All kinds, in registry order.
    pub const ALL: [NodeKind; 48] = [
        NodeKind::MuleConfiguration,
        NodeKind::Description,
        NodeKind::MuleEnvironmentProperties,
        NodeKind::ThreadingProfile,
        NodeKind::PoolingProfile,
        NodeKind::QueueProfile,
        NodeKind::ClassDefinition,
        NodeKind::ContainerContext,
        NodeKind::SecurityManager,
        NodeKind::SecurityProvider,
        NodeKind::EncryptionStrategy,
        NodeKind::TransactionManager,
        NodeKind::Agents,
        NodeKind::Agent,
        NodeKind::Connector,
        NodeKind::ExceptionStrategy,
        NodeKind::EndpointIdentifiers,
        NodeKind::EndpointIdentifier,
        NodeKind::Transformers,
        NodeKind::Transformer,
        NodeKind::GlobalEndpoints,
        NodeKind::CatalogEndpoint,
        NodeKind::Endpoint,
        NodeKind::GlobalEndpoint,
        NodeKind::Transaction,
        NodeKind::Constraint,
        NodeKind::Filter,
        NodeKind::SecurityFilter,
        NodeKind::InterceptorStack,
        NodeKind::StackInterceptor,
        NodeKind::Interceptor,
        NodeKind::Model,
        NodeKind::MuleDescriptor,
        NodeKind::InboundRouter,
        NodeKind::OutboundRouter,
        NodeKind::ResponseRouter,
        NodeKind::Router,
        NodeKind::ReplyTo,
        NodeKind::CatchAllStrategy,
        NodeKind::Properties,
        NodeKind::Property,
        NodeKind::TextProperty,
        NodeKind::SystemProperty,
        NodeKind::FactoryProperty,
        NodeKind::FileProperties,
        NodeKind::MapProperty,
        NodeKind::ListProperty,
        NodeKind::ListEntry,
    ];

    /// Position of this kind in [`NodeKind::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::MuleConfiguration => "MuleConfiguration",
            NodeKind::Description => "Description",
            NodeKind::MuleEnvironmentProperties => "MuleEnvironmentProperties",
            NodeKind::ThreadingProfile => "ThreadingProfile",
            NodeKind::PoolingProfile => "PoolingProfile",
            NodeKind::QueueProfile => "QueueProfile",
            NodeKind::ClassDefinition => "ClassDefinition",
            NodeKind::ContainerContext => "ContainerContext",
            NodeKind::SecurityManager => "SecurityManager",
            NodeKind::SecurityProvider => "SecurityProvider",
            NodeKind::EncryptionStrategy => "EncryptionStrategy",
            NodeKind::TransactionManager => "TransactionManager",
            NodeKind::Agents => "Agents",
            NodeKind::Agent => "Agent",
            NodeKind::Connector => "Connector",
            NodeKind::ExceptionStrategy => "ExceptionStrategy",
            NodeKind::EndpointIdentifiers => "EndpointIdentifiers",
            NodeKind::EndpointIdentifier => "EndpointIdentifier",
            NodeKind::Transformers => "Transformers",
            NodeKind::Transformer => "Transformer",
            NodeKind::GlobalEndpoints => "GlobalEndpoints",
            NodeKind::CatalogEndpoint => "CatalogEndpoint",
            NodeKind::Endpoint => "Endpoint",
            NodeKind::GlobalEndpoint => "GlobalEndpoint",
            NodeKind::Transaction => "Transaction",
            NodeKind::Constraint => "Constraint",
            NodeKind::Filter => "Filter",
            NodeKind::SecurityFilter => "SecurityFilter",
            NodeKind::InterceptorStack => "InterceptorStack",
            NodeKind::StackInterceptor => "StackInterceptor",
            NodeKind::Interceptor => "Interceptor",
            NodeKind::Model => "Model",
            NodeKind::MuleDescriptor => "MuleDescriptor",
            NodeKind::InboundRouter => "InboundRouter",
            NodeKind::OutboundRouter => "OutboundRouter",
            NodeKind::ResponseRouter => "ResponseRouter",
            NodeKind::Router => "Router",
            NodeKind::ReplyTo => "ReplyTo",
            NodeKind::CatchAllStrategy => "CatchAllStrategy",
            NodeKind::Properties => "Properties",
            NodeKind::Property => "Property",
            NodeKind::TextProperty => "TextProperty",
            NodeKind::SystemProperty => "SystemProperty",
            NodeKind::FactoryProperty => "FactoryProperty",
            NodeKind::FileProperties => "FileProperties",
            NodeKind::MapProperty => "MapProperty",
            NodeKind::ListProperty => "ListProperty",
            NodeKind::ListEntry => "ListEntry",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_discriminant_order() {
        for (position, kind) in NodeKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), position, "{} is out of order", kind);
        }
    }

    #[test]
    fn display_uses_kind_name() {
        assert_eq!(NodeKind::Endpoint.to_string(), "Endpoint");
        assert_eq!(NodeKind::MuleDescriptor.to_string(), "MuleDescriptor");
    }
}
