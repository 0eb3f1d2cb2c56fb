//! Filter expressions
//!
//! A `filter` element (and its `left-filter` / `right-filter` /
//! nested `filter` operands) describes a boolean expression over messages.
//! Composite filters are recognised by the suffix of their class name:
//!
//! | Class name suffix | Expression | Operands                                   |
//! |-------------------|------------|--------------------------------------------|
//! | `AndFilter`       | `And`      | `left-filter` and `right-filter`           |
//! | `OrFilter`        | `Or`       | `left-filter` and `right-filter`           |
//! | `NotFilter`       | `Not`      | exactly one of `filter` or `left-filter`   |
//! | anything else     | `Leaf`     | none                                       |
//!
//! Leaves are evaluated by a [`Predicate`] supplied by the caller; the
//! expression itself only implements the boolean composition.

use super::node::Node;
use super::properties::{PropertyMap, PropertyValue};
use crate::schema::NodeKind;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Deepest filter expression built from a node tree.
const MAX_FILTER_DEPTH: usize = crate::codec::MAX_NESTING_DEPTH;

/// Typed filter attributes copied into leaf properties, in this order.
const LEAF_ATTRIBUTES: [&str; 5] = ["expectedType", "expression", "pattern", "path", "configFile"];

/// Composition implied by a filter class name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterShape {
    And,
    Or,
    Not,
    Leaf,
}

impl FilterShape {
    pub fn of_class(class_name: &str) -> Self {
        if class_name.ends_with("AndFilter") {
            FilterShape::And
        } else if class_name.ends_with("OrFilter") {
            FilterShape::Or
        } else if class_name.ends_with("NotFilter") {
            FilterShape::Not
        } else {
            FilterShape::Leaf
        }
    }

    /// Check one filter element's operand roles against its className.
    /// Operands are not inspected.
    pub fn check_operands(node: &Node) -> Result<Self, FilterCompositionError> {
        if node.kind() != NodeKind::Filter {
            return Err(FilterCompositionError::NotAFilter { kind: node.kind() });
        }
        let class_name = node.get_str("className").ok_or(FilterCompositionError::MissingClassName)?;
        let missing = |role| FilterCompositionError::MissingOperand { class_name: class_name.to_string(), role };
        let unexpected =
            |role| FilterCompositionError::UnexpectedOperand { class_name: class_name.to_string(), role };

        let filter = node.child("filter").is_some();
        let left = node.child("left-filter").is_some();
        let right = node.child("right-filter").is_some();

        let shape = Self::of_class(class_name);
        match shape {
            FilterShape::And | FilterShape::Or => {
                if filter {
                    return Err(unexpected("filter"));
                }
                if !left {
                    return Err(missing("left-filter"));
                }
                if !right {
                    return Err(missing("right-filter"));
                }
            }
            FilterShape::Not => {
                if right {
                    return Err(unexpected("right-filter"));
                }
                match (filter, left) {
                    (true, false) | (false, true) => {}
                    (false, false) => return Err(missing("filter")),
                    (true, true) => return Err(unexpected("left-filter")),
                }
            }
            FilterShape::Leaf => {
                for (role, present) in [("filter", filter), ("left-filter", left), ("right-filter", right)] {
                    if present {
                        return Err(unexpected(role));
                    }
                }
            }
        }
        Ok(shape)
    }
}

/// Why a filter element does not form a valid expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterCompositionError {
    #[error("{kind} is not a filter")]
    NotAFilter { kind: NodeKind },

    #[error("filter has no className")]
    MissingClassName,

    #[error("{class_name} requires a '{role}' operand")]
    MissingOperand { class_name: String, role: &'static str },

    #[error("{class_name} does not take a '{role}' operand")]
    UnexpectedOperand { class_name: String, role: &'static str },

    #[error("filter nesting exceeds {limit} levels")]
    TooDeep { limit: usize },
}

/// Failure to evaluate a leaf filter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredicateError {
    #[error("No predicate registered for filter class '{class_name}'")]
    UnknownPredicate { class_name: String },

    #[error("Predicate '{class_name}' failed: {message}")]
    Failed { class_name: String, message: String },
}

/// A filter with no operands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeafFilter {
    pub predicate_class_name: String,
    pub properties: PropertyMap,
}

impl LeafFilter {
    pub fn new<S: Into<String>>(predicate_class_name: S) -> Self {
        Self { predicate_class_name: predicate_class_name.into(), properties: PropertyMap::new() }
    }

    pub fn with_property<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.properties.insert(name, PropertyValue::Value { value: value.into() });
        self
    }

    /// Plain property value, e.g. the `pattern` of a wildcard filter.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get_str(name)
    }

    /// Class name without its package.
    pub fn simple_class_name(&self) -> &str {
        simple_name(&self.predicate_class_name)
    }
}

fn simple_name(class_name: &str) -> &str {
    class_name.rsplit('.').next().unwrap_or(class_name)
}

/// Boolean filter expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FilterExpression {
    Leaf(LeafFilter),
    And { left: Box<FilterExpression>, right: Box<FilterExpression> },
    Or { left: Box<FilterExpression>, right: Box<FilterExpression> },
    Not { inner: Box<FilterExpression> },
}

impl FilterExpression {
    pub fn leaf(leaf: LeafFilter) -> Self {
        FilterExpression::Leaf(leaf)
    }

    pub fn and(left: FilterExpression, right: FilterExpression) -> Self {
        FilterExpression::And { left: Box::new(left), right: Box::new(right) }
    }

    pub fn or(left: FilterExpression, right: FilterExpression) -> Self {
        FilterExpression::Or { left: Box::new(left), right: Box::new(right) }
    }

    pub fn negate(inner: FilterExpression) -> Self {
        FilterExpression::Not { inner: Box::new(inner) }
    }

    /// Build the expression rooted at a filter node.
    pub fn from_node(node: &Node) -> Result<Self, FilterCompositionError> {
        Self::build(node, 1)
    }

    fn build(node: &Node, depth: usize) -> Result<Self, FilterCompositionError> {
        if depth > MAX_FILTER_DEPTH {
            return Err(FilterCompositionError::TooDeep { limit: MAX_FILTER_DEPTH });
        }
        let shape = FilterShape::check_operands(node)?;
        let class_name = node.get_str("className").unwrap_or_default();
        let operand = |role| {
            node.child(role)
                .ok_or_else(|| FilterCompositionError::MissingOperand { class_name: class_name.to_string(), role })
        };

        match shape {
            FilterShape::And | FilterShape::Or => {
                let left = Self::build(operand("left-filter")?, depth + 1)?;
                let right = Self::build(operand("right-filter")?, depth + 1)?;
                Ok(if shape == FilterShape::And { Self::and(left, right) } else { Self::or(left, right) })
            }
            FilterShape::Not => {
                let inner = operand("filter").or_else(|_| operand("left-filter"))?;
                Ok(Self::negate(Self::build(inner, depth + 1)?))
            }
            FilterShape::Leaf => {
                let mut properties = PropertyMap::new();
                for name in LEAF_ATTRIBUTES {
                    if let Some(value) = node.get_str(name) {
                        properties.insert(name, PropertyValue::Value { value: value.to_string() });
                    }
                }
                for (name, value) in PropertyMap::of(node).iter() {
                    properties.insert(name, value.clone());
                }

                Ok(Self::Leaf(LeafFilter { predicate_class_name: class_name.to_string(), properties }))
            }
        }
    }

    /// Evaluate against a message. `And` and `Or` short-circuit left to right.
    pub fn evaluate<M, P>(&self, message: &M, predicates: &P) -> Result<bool, PredicateError>
    where
        M: ?Sized,
        P: Predicate<M> + ?Sized,
    {
        match self {
            FilterExpression::Leaf(leaf) => predicates.test(leaf, message),
            FilterExpression::And { left, right } => {
                Ok(left.evaluate(message, predicates)? && right.evaluate(message, predicates)?)
            }
            FilterExpression::Or { left, right } => {
                Ok(left.evaluate(message, predicates)? || right.evaluate(message, predicates)?)
            }
            FilterExpression::Not { inner } => Ok(!inner.evaluate(message, predicates)?),
        }
    }

    /// Leaves in left-to-right order.
    pub fn leaves(&self) -> Vec<&LeafFilter> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a LeafFilter>) {
        match self {
            FilterExpression::Leaf(leaf) => out.push(leaf),
            FilterExpression::And { left, right } | FilterExpression::Or { left, right } => {
                left.collect_leaves(out);
                right.collect_leaves(out);
            }
            FilterExpression::Not { inner } => inner.collect_leaves(out),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            FilterExpression::Leaf(_) => 1,
            FilterExpression::And { left, right } | FilterExpression::Or { left, right } => {
                1 + left.depth().max(right.depth())
            }
            FilterExpression::Not { inner } => 1 + inner.depth(),
        }
    }
}

impl TryFrom<&Node> for FilterExpression {
    type Error = FilterCompositionError;

    fn try_from(node: &Node) -> Result<Self, Self::Error> {
        Self::from_node(node)
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpression::Leaf(leaf) => {
                write!(f, "{}", leaf.simple_class_name())?;
                if let Some(pattern) = leaf.property("pattern").or_else(|| leaf.property("expression")) {
                    write!(f, "({})", pattern)?;
                }
                Ok(())
            }
            FilterExpression::And { left, right } => write!(f, "({} and {})", left, right),
            FilterExpression::Or { left, right } => write!(f, "({} or {})", left, right),
            FilterExpression::Not { inner } => write!(f, "not {}", inner),
        }
    }
}

/// Evaluates leaf filters against messages of type `M`.
pub trait Predicate<M: ?Sized> {
    fn test(&self, leaf: &LeafFilter, message: &M) -> Result<bool, PredicateError>;
}

impl<M, F> Predicate<M> for F
where
    M: ?Sized,
    F: Fn(&LeafFilter, &M) -> Result<bool, PredicateError>,
{
    fn test(&self, leaf: &LeafFilter, message: &M) -> Result<bool, PredicateError> {
        self(leaf, message)
    }
}

type PredicateFn<M> = Box<dyn Fn(&LeafFilter, &M) -> bool + Send + Sync>;

/// Predicates keyed by filter class name. A registration under a simple name
/// (`WildcardFilter`) also matches fully qualified class names ending in it.
pub struct PredicateRegistry<M: ?Sized> {
    predicates: HashMap<String, PredicateFn<M>>,
}

impl<M: ?Sized> Default for PredicateRegistry<M> {
    fn default() -> Self {
        Self { predicates: HashMap::new() }
    }
}

impl<M: ?Sized> PredicateRegistry<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S, F>(mut self, class_name: S, predicate: F) -> Self
    where
        S: Into<String>,
        F: Fn(&LeafFilter, &M) -> bool + Send + Sync + 'static,
    {
        self.predicates.insert(class_name.into(), Box::new(predicate));
        self
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.lookup(class_name).is_some()
    }

    fn lookup(&self, class_name: &str) -> Option<&PredicateFn<M>> {
        self.predicates.get(class_name).or_else(|| self.predicates.get(simple_name(class_name)))
    }
}

impl<M: ?Sized> Predicate<M> for PredicateRegistry<M> {
    fn test(&self, leaf: &LeafFilter, message: &M) -> Result<bool, PredicateError> {
        let predicate = self.lookup(&leaf.predicate_class_name).ok_or_else(|| {
            PredicateError::UnknownPredicate { class_name: leaf.predicate_class_name.clone() }
        })?;
        Ok(predicate(leaf, message))
    }
}

impl<M: ?Sized> fmt::Debug for PredicateRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.predicates.keys().collect();
        names.sort();
        f.debug_struct("PredicateRegistry").field("predicates", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn filter(class_name: &str) -> Node {
        Node::standard(NodeKind::Filter).with("className", class_name).expect("className")
    }

    fn wildcard(pattern: &str) -> Node {
        filter("org.mule.routing.filters.WildcardFilter").with("pattern", pattern).expect("pattern")
    }

    fn binary(class_name: &str, left: Node, right: Node) -> Node {
        let mut node = filter(class_name);
        node.push_child("left-filter", left).expect("left");
        node.push_child("right-filter", right).expect("right");
        node
    }

    fn wildcard_registry() -> PredicateRegistry<str> {
        PredicateRegistry::new().register("WildcardFilter", |leaf: &LeafFilter, message: &str| {
            match leaf.property("pattern") {
                Some(pattern) => match pattern.strip_suffix('*') {
                    Some(prefix) => message.starts_with(prefix),
                    None => message == pattern,
                },
                None => false,
            }
        })
    }

    #[test]
    fn builds_leaf_with_typed_attributes_and_properties() {
        let mut node = filter("org.mule.routing.filters.xml.JXPathFilter").with("expression", "/a/b").expect("expr");
        let mut properties = Node::standard(NodeKind::Properties);
        properties
            .push_child(
                "property",
                Node::standard(NodeKind::Property)
                    .with("name", "expectedValue")
                    .and_then(|p| p.with("value", "true"))
                    .expect("property"),
            )
            .expect("property");
        node.push_child("properties", properties).expect("properties");

        let expression = FilterExpression::try_from(&node).expect("leaf");
        let FilterExpression::Leaf(leaf) = expression else {
            panic!("expected leaf");
        };
        assert_eq!(leaf.simple_class_name(), "JXPathFilter");
        assert_eq!(leaf.property("expression"), Some("/a/b"));
        assert_eq!(leaf.property("expectedValue"), Some("true"));
    }

    #[test]
    fn builds_nested_composition() {
        let mut not = filter("org.mule.routing.filters.logic.NotFilter");
        not.push_child("filter", wildcard("draft*")).expect("operand");
        let node = binary("org.mule.routing.filters.logic.AndFilter", wildcard("order*"), not);

        let expression = FilterExpression::from_node(&node).expect("valid");
        assert_eq!(expression.to_string(), "(WildcardFilter(order*) and not WildcardFilter(draft*))");
        assert_eq!(expression.leaves().len(), 2);
        assert_eq!(expression.depth(), 3);
    }

    #[test]
    fn rejects_malformed_compositions() {
        let mut and = filter("AndFilter");
        and.push_child("left-filter", wildcard("a")).expect("left");
        assert_eq!(
            FilterExpression::from_node(&and),
            Err(FilterCompositionError::MissingOperand { class_name: "AndFilter".to_string(), role: "right-filter" })
        );

        let mut not = filter("NotFilter");
        not.push_child("filter", wildcard("a")).expect("filter");
        not.push_child("left-filter", wildcard("b")).expect("left");
        assert!(matches!(
            FilterExpression::from_node(&not),
            Err(FilterCompositionError::UnexpectedOperand { role: "left-filter", .. })
        ));

        let mut leaf = wildcard("a");
        leaf.push_child("filter", wildcard("b")).expect("nested");
        assert!(matches!(
            FilterExpression::from_node(&leaf),
            Err(FilterCompositionError::UnexpectedOperand { role: "filter", .. })
        ));

        assert!(matches!(
            FilterExpression::from_node(&Node::standard(NodeKind::Endpoint)),
            Err(FilterCompositionError::NotAFilter { .. })
        ));
    }

    #[test]
    fn operand_check_ignores_the_operands_themselves() {
        let broken_not = filter("NotFilter");
        let mut and = filter("AndFilter");
        and.push_child("left-filter", broken_not).expect("left");
        and.push_child("right-filter", wildcard("b")).expect("right");

        assert_eq!(FilterShape::check_operands(&and), Ok(FilterShape::And));
        assert!(matches!(
            FilterExpression::from_node(&and),
            Err(FilterCompositionError::MissingOperand { role: "filter", .. })
        ));
    }

    #[test]
    fn very_deep_compositions_are_refused() {
        let mut node = wildcard("x");
        for _ in 0..MAX_FILTER_DEPTH {
            let mut not = filter("NotFilter");
            not.push_child("filter", node).expect("operand");
            node = not;
        }
        assert_eq!(FilterExpression::from_node(&node), Err(FilterCompositionError::TooDeep { limit: MAX_FILTER_DEPTH }));
    }

    #[test]
    fn not_accepts_left_filter_operand() {
        let mut not = filter("NotFilter");
        not.push_child("left-filter", wildcard("x")).expect("left");
        let expression = FilterExpression::from_node(&not).expect("valid");
        assert!(!expression.evaluate("x", &wildcard_registry()).expect("evaluates"));
        assert!(expression.evaluate("y", &wildcard_registry()).expect("evaluates"));
    }

    #[test]
    fn and_short_circuits_on_false_left() {
        let expression = FilterExpression::and(
            FilterExpression::leaf(LeafFilter::new("Never")),
            FilterExpression::leaf(LeafFilter::new("Counted")),
        );
        let calls = Cell::new(0);
        let predicate = |leaf: &LeafFilter, _: &str| -> Result<bool, PredicateError> {
            if leaf.predicate_class_name == "Counted" {
                calls.set(calls.get() + 1);
            }
            Ok(false)
        };

        assert!(!expression.evaluate("message", &predicate).expect("evaluates"));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn or_short_circuits_on_true_left() {
        let expression = FilterExpression::or(
            FilterExpression::leaf(LeafFilter::new("WildcardFilter").with_property("pattern", "a*")),
            FilterExpression::leaf(LeafFilter::new("Unregistered")),
        );
        let registry = wildcard_registry();
        assert!(expression.evaluate("abc", &registry).expect("short-circuits"));

        let err = expression.evaluate("xyz", &registry).unwrap_err();
        assert_eq!(err, PredicateError::UnknownPredicate { class_name: "Unregistered".to_string() });
    }

    #[test]
    fn registry_matches_fully_qualified_names() {
        let registry = wildcard_registry();
        assert!(registry.contains("org.mule.routing.filters.WildcardFilter"));
        assert!(registry.contains("WildcardFilter"));
        assert!(!registry.contains("RegExFilter"));
    }
}
