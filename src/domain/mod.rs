//! Domain layer
//!
//! The configuration model proper: typed nodes with tri-state attributes,
//! filter expressions, reference resolution against the global catalogs,
//! immutable documents with typed read views, and the snapshot store.
//!
//! ## Module Organization
//!
//! - `attribute`: tri-state attribute slots and typed values
//! - `node`: the node tree, mixed content and node paths
//! - `filter`: boolean filter expressions and predicate evaluation
//! - `properties`: flattened `<properties>` blocks
//! - `resolver`: catalog index and reference resolution
//! - `document`: documents, prologs and the document builder
//! - `endpoint`, `router`, `descriptor`, `profile`: typed read views
//! - `store`: validated snapshot publishing

pub mod attribute;
pub mod descriptor;
pub mod document;
pub mod endpoint;
pub mod filter;
pub mod node;
pub mod profile;
pub mod properties;
pub mod resolver;
pub mod router;
pub mod store;

// Re-export main types from each module
pub use attribute::{AttributeSlot, AttributeValue, SlotState};
pub use descriptor::{DescriptorView, InterceptorRef, ModelView};
pub use document::{ConfigurationDocument, DocumentBuilder, Prolog, PrologItem, XmlDeclaration};
pub use endpoint::{EndpointShape, EndpointView};
pub use filter::{
    FilterCompositionError, FilterExpression, FilterShape, LeafFilter, Predicate, PredicateError,
    PredicateRegistry,
};
pub use node::{ChildRef, Content, MixedItem, Node, NodePath};
pub use profile::{EnvironmentView, PoolingProfileView, QueueProfileView, ThreadingProfileView};
pub use properties::{PropertiesFile, PropertyMap, PropertyValue};
pub use resolver::{
    EndpointResolution, EndpointTarget, NamedReference, ReferenceResolver, UnresolvedReference,
};
pub use router::{CatchAllView, Dispatch, RouterEntryView, RouterKind, RouterView, RoutingError};
pub use store::{DocumentStore, Snapshot};

use std::str::FromStr;

/// Effective value of an enumerated attribute parsed into its typed enum.
pub(crate) fn typed<T: FromStr>(node: &Node, attribute: &str) -> Option<T> {
    node.get_str(attribute).and_then(|literal| literal.parse().ok())
}
