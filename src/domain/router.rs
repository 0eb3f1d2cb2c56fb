//! Router collections and message dispatch
//!
//! A descriptor may carry an inbound, an outbound and a response router
//! collection. Each collection holds an ordered list of router entries and
//! optionally a catch-all strategy. Dispatch evaluates entries in document
//! order: an entry without a filter always matches, `matchAll = false` stops
//! at the first match, and a message no entry accepts goes to the catch-all
//! strategy when one is configured.

use super::document::ConfigurationDocument;
use super::endpoint::EndpointView;
use super::filter::{FilterCompositionError, FilterExpression, Predicate, PredicateError};
use super::node::Node;
use super::properties::PropertyMap;
use super::resolver::UnresolvedReference;
use super::typed;
use crate::schema::{EnableCorrelation, NodeKind, TransactionAction};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouterKind {
    Inbound,
    Outbound,
    Response,
}

impl RouterKind {
    pub fn of(kind: NodeKind) -> Option<Self> {
        match kind {
            NodeKind::InboundRouter => Some(RouterKind::Inbound),
            NodeKind::OutboundRouter => Some(RouterKind::Outbound),
            NodeKind::ResponseRouter => Some(RouterKind::Response),
            _ => None,
        }
    }

    /// Element name of the collection.
    pub fn role(&self) -> &'static str {
        match self {
            RouterKind::Inbound => "inbound-router",
            RouterKind::Outbound => "outbound-router",
            RouterKind::Response => "response-router",
        }
    }
}

impl fmt::Display for RouterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.role())
    }
}

/// Failure while dispatching a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoutingError {
    #[error(transparent)]
    Predicate(#[from] PredicateError),

    #[error("Invalid filter: {0}")]
    Filter(#[from] FilterCompositionError),
}

/// Outcome of dispatching a message through a router collection.
#[derive(Debug, Clone)]
pub enum Dispatch<'a> {
    /// Matching entries, in document order.
    Routed(Vec<RouterEntryView<'a>>),
    /// No entry matched; the catch-all strategy takes the message.
    CatchAll(CatchAllView<'a>),
    /// No entry matched and there is no catch-all strategy.
    Unrouted,
}

impl<'a> Dispatch<'a> {
    pub fn is_routed(&self) -> bool {
        matches!(self, Dispatch::Routed(_))
    }

    pub fn routes(&self) -> &[RouterEntryView<'a>] {
        match self {
            Dispatch::Routed(entries) => entries,
            _ => &[],
        }
    }
}

/// A router collection of a descriptor.
#[derive(Debug, Clone, Copy)]
pub struct RouterView<'a> {
    kind: RouterKind,
    node: &'a Node,
    document: &'a ConfigurationDocument,
}

impl<'a> RouterView<'a> {
    /// View over a router collection node. Other node kinds yield `None`.
    pub fn new(node: &'a Node, document: &'a ConfigurationDocument) -> Option<Self> {
        RouterKind::of(node.kind()).map(|kind| Self { kind, node, document })
    }

    pub fn kind(&self) -> RouterKind {
        self.kind
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn match_all(&self) -> bool {
        self.node.get_bool("matchAll").unwrap_or(false)
    }

    /// Response aggregation timeout in milliseconds.
    pub fn timeout(&self) -> Option<i64> {
        self.node.get_integer("timeout")
    }

    pub fn entries(&self) -> Vec<RouterEntryView<'a>> {
        self.node
            .children("router")
            .iter()
            .map(|node| RouterEntryView { node, document: self.document })
            .collect()
    }

    pub fn catch_all(&self) -> Option<CatchAllView<'a>> {
        self.node.child("catch-all-strategy").map(|node| CatchAllView { node, document: self.document })
    }

    /// Endpoints declared directly on the collection (`endpoint` then
    /// `global-endpoint`).
    pub fn endpoints(&self) -> Result<Vec<EndpointView<'a>>, UnresolvedReference> {
        endpoints_of(self.node, self.document)
    }

    /// Route a message through the collection.
    pub fn dispatch<M, P>(&self, message: &M, predicates: &P) -> Result<Dispatch<'a>, RoutingError>
    where
        M: ?Sized,
        P: Predicate<M> + ?Sized,
    {
        let match_all = self.match_all();
        let mut routed = Vec::new();
        for entry in self.entries() {
            if entry.accepts(message, predicates)? {
                routed.push(entry);
                if !match_all {
                    break;
                }
            }
        }

        if !routed.is_empty() {
            return Ok(Dispatch::Routed(routed));
        }
        Ok(match self.catch_all() {
            Some(catch_all) => Dispatch::CatchAll(catch_all),
            None => Dispatch::Unrouted,
        })
    }
}

fn endpoints_of<'a>(
    node: &'a Node,
    document: &'a ConfigurationDocument,
) -> Result<Vec<EndpointView<'a>>, UnresolvedReference> {
    let resolver = document.resolver();
    node.children("endpoint")
        .iter()
        .chain(node.children("global-endpoint"))
        .map(|endpoint| EndpointView::resolve(endpoint, &resolver))
        .collect()
}

/// One `router` entry of a collection.
#[derive(Debug, Clone, Copy)]
pub struct RouterEntryView<'a> {
    node: &'a Node,
    document: &'a ConfigurationDocument,
}

impl<'a> RouterEntryView<'a> {
    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn class_name(&self) -> Option<&'a str> {
        self.node.get_str("className")
    }

    pub fn enable_correlation(&self) -> EnableCorrelation {
        typed(self.node, "enableCorrelation").unwrap_or(EnableCorrelation::IfNotSet)
    }

    pub fn property_extractor(&self) -> Option<&'a str> {
        self.node.get_str("propertyExtractor")
    }

    pub fn filter(&self) -> Option<Result<FilterExpression, FilterCompositionError>> {
        self.node.child("filter").map(FilterExpression::from_node)
    }

    pub fn endpoints(&self) -> Result<Vec<EndpointView<'a>>, UnresolvedReference> {
        endpoints_of(self.node, self.document)
    }

    pub fn reply_to(&self) -> Option<&'a str> {
        self.node.child("reply-to").and_then(|node| node.get_str("address"))
    }

    pub fn transaction_action(&self) -> Option<TransactionAction> {
        self.node.child("transaction").and_then(|node| typed(node, "action"))
    }

    pub fn properties(&self) -> PropertyMap {
        PropertyMap::of(self.node)
    }

    /// Whether the entry takes the message. Entries without a filter always do.
    pub fn accepts<M, P>(&self, message: &M, predicates: &P) -> Result<bool, RoutingError>
    where
        M: ?Sized,
        P: Predicate<M> + ?Sized,
    {
        match self.filter() {
            Some(filter) => Ok(filter?.evaluate(message, predicates)?),
            None => Ok(true),
        }
    }
}

/// Strategy receiving messages no router entry accepted.
#[derive(Debug, Clone, Copy)]
pub struct CatchAllView<'a> {
    node: &'a Node,
    document: &'a ConfigurationDocument,
}

impl<'a> CatchAllView<'a> {
    pub fn class_name(&self) -> Option<&'a str> {
        self.node.get_str("className")
    }

    pub fn endpoint(&self) -> Option<Result<EndpointView<'a>, UnresolvedReference>> {
        let node = self.node.child("endpoint").or_else(|| self.node.child("global-endpoint"))?;
        Some(EndpointView::resolve(node, &self.document.resolver()))
    }

    pub fn properties(&self) -> PropertyMap {
        PropertyMap::of(self.node)
    }
}
