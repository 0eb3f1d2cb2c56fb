//! # Validation Rules
//!
//! Per-node and per-catalog checks. Each rule appends its findings to the
//! output vector and never stops the traversal.

use super::violations::{Violation, ViolationKind};
use crate::domain::resolver::references_of;
use crate::domain::{FilterCompositionError, FilterShape, Node, NodePath, ReferenceResolver};
use crate::errors::MuleConfigError;
use crate::schema::{NodeKind, ReferenceKind, SchemaRegistry};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Catalog names must be usable inside whitespace separated name lists.
static CATALOG_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\S+$").expect("valid regex"));

/// Required attributes without an effective value, and stored values that
/// do not fit their declared type or domain.
pub fn check_attributes(node: &Node, path: &NodePath, out: &mut Vec<Violation>) {
    for slot in node.attributes() {
        let spec = slot.spec();
        if spec.required && slot.effective().is_none() {
            out.push(Violation::new(
                path.clone(),
                ViolationKind::MissingRequiredAttribute { kind: node.kind(), attribute: spec.name.to_string() },
            ));
            continue;
        }

        let Some(value) = slot.value() else {
            continue;
        };
        match value.conform(node.kind(), spec) {
            Ok(()) => {}
            Err(MuleConfigError::InvalidEnumValue { kind, attribute, value }) => {
                out.push(Violation::new(path.clone(), ViolationKind::InvalidEnumValue { kind, attribute, value }))
            }
            Err(MuleConfigError::InvalidAttributeValue { kind, attribute, value, expected }) => out.push(
                Violation::new(path.clone(), ViolationKind::InvalidAttributeValue { kind, attribute, value, expected }),
            ),
            Err(other) => out.push(Violation::new(
                path.clone(),
                ViolationKind::InvalidAttributeValue {
                    kind: node.kind(),
                    attribute: spec.name.to_string(),
                    value: value.to_literal(),
                    expected: other.to_string(),
                },
            )),
        }
    }
}

/// Requirements that depend on more than one attribute.
pub fn check_conditional_attributes(node: &Node, path: &NodePath, out: &mut Vec<Violation>) {
    match node.kind() {
        NodeKind::Endpoint => match (node.get_str("ref"), node.get_str("address")) {
            (None, None) => out.push(Violation::new(
                path.clone(),
                ViolationKind::MissingRequiredAttribute {
                    kind: NodeKind::Endpoint,
                    attribute: "address or ref".to_string(),
                },
            )),
            (Some(reference), Some(address)) => out.push(Violation::new(
                path.clone(),
                ViolationKind::AmbiguousEndpointDefinition {
                    reference: reference.to_string(),
                    address: address.to_string(),
                },
            )),
            _ => {}
        },
        NodeKind::Interceptor if node.get("className").is_none() && node.get("name").is_none() => {
            out.push(Violation::new(
                path.clone(),
                ViolationKind::MissingRequiredAttribute {
                    kind: NodeKind::Interceptor,
                    attribute: "className or name".to_string(),
                },
            ))
        }
        _ => {}
    }
}

/// Reference-bearing attributes whose names are missing from their catalog.
/// A name repeated within one attribute is reported once.
pub fn check_references(node: &Node, path: &NodePath, resolver: &ReferenceResolver<'_>, out: &mut Vec<Violation>) {
    let mut reported: HashSet<(&str, &str)> = HashSet::new();
    for reference in references_of(node) {
        if resolver.contains(reference.kind, reference.name) {
            continue;
        }
        if reported.insert((reference.attribute, reference.name)) {
            out.push(Violation::new(
                path.clone(),
                ViolationKind::UnresolvedReference {
                    kind: reference.kind,
                    name: reference.name.to_string(),
                    attribute: reference.attribute.to_string(),
                },
            ));
        }
    }
}

/// Roles the registry marks as mandatory that hold no child.
pub fn check_required_children(
    node: &Node,
    path: &NodePath,
    registry: &SchemaRegistry,
    out: &mut Vec<Violation>,
) {
    for spec in &registry.schema(node.kind()).children {
        if spec.cardinality.is_required() && node.children(spec.role).is_empty() {
            out.push(Violation::new(
                path.clone(),
                ViolationKind::MissingRequiredElement { kind: node.kind(), role: spec.role.to_string() },
            ));
        }
    }
}

/// Operand roles of a filter element against its class name. Operands are
/// checked on their own visit. Filters without a class name are already
/// reported as missing a required attribute.
pub fn check_filter_composition(node: &Node, path: &NodePath, out: &mut Vec<Violation>) {
    if node.kind() != NodeKind::Filter {
        return;
    }
    match FilterShape::check_operands(node) {
        Ok(_) | Err(FilterCompositionError::MissingClassName) => {}
        Err(err) => out.push(Violation::new(
            path.clone(),
            ViolationKind::InvalidFilterComposition { reason: err.to_string() },
        )),
    }
}

fn bound_violation(node: &Node, attribute: &str, limit_attribute: &str) -> Option<ViolationKind> {
    let value = node.get_integer(attribute)?;
    let limit = node.get_integer(limit_attribute)?;
    (value > limit).then(|| ViolationKind::ProfileBounds {
        kind: node.kind(),
        attribute: attribute.to_string(),
        value,
        limit_attribute: limit_attribute.to_string(),
        limit,
    })
}

/// Idle limits above active limits in threading and pooling profiles.
pub fn check_profile_bounds(node: &Node, path: &NodePath, out: &mut Vec<Violation>) {
    let finding = match node.kind() {
        NodeKind::ThreadingProfile => bound_violation(node, "maxThreadsIdle", "maxThreadsActive"),
        NodeKind::PoolingProfile => bound_violation(node, "maxIdle", "maxActive"),
        _ => None,
    };
    if let Some(kind) = finding {
        out.push(Violation::new(path.clone(), kind));
    }
}

/// Duplicate and unreferenceable names in every global catalog.
pub fn check_catalogs(root: &Node, out: &mut Vec<Violation>) {
    let root_path = NodePath::root();
    for kind in ReferenceKind::ALL {
        let (container, role) = kind.catalog_location();
        let (base, entries) = match container {
            Some(container) => match root.child(container) {
                Some(node) => (root_path.child(container, None), node.children(role)),
                None => continue,
            },
            None => (root_path.clone(), root.children(role)),
        };

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (index, entry) in entries.iter().enumerate() {
            let Some(name) = entry.get_str("name") else {
                continue;
            };
            let path = base.child(role, Some(index));

            if !CATALOG_NAME.is_match(name) {
                out.push(Violation::new(path.clone(), ViolationKind::InvalidName { kind, name: name.to_string() }));
            }

            let count = seen.entry(name).or_insert(0);
            *count += 1;
            if *count == 2 {
                out.push(Violation::new(path, ViolationKind::DuplicateName { kind, name: name.to_string() }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resolver::build_index;

    fn path() -> NodePath {
        NodePath::root()
    }

    #[test]
    fn endpoint_needs_address_or_ref_but_not_both() {
        let mut out = Vec::new();
        check_conditional_attributes(&Node::standard(NodeKind::Endpoint), &path(), &mut out);
        assert!(matches!(&out[0].kind, ViolationKind::MissingRequiredAttribute { attribute, .. } if attribute == "address or ref"));

        let both = Node::standard(NodeKind::Endpoint)
            .with("ref", "Orders")
            .and_then(|e| e.with("address", "vm://orders"))
            .expect("endpoint");
        let mut out = Vec::new();
        check_conditional_attributes(&both, &path(), &mut out);
        assert!(matches!(out[0].kind, ViolationKind::AmbiguousEndpointDefinition { .. }));
    }

    #[test]
    fn repeated_missing_names_are_reported_once_per_attribute() {
        let root = Node::standard(NodeKind::MuleConfiguration);
        let index = build_index(&root);
        let resolver = crate::domain::resolver::ReferenceResolver::new(&root, &index);

        let endpoint = Node::standard(NodeKind::Endpoint)
            .with("address", "vm://in")
            .and_then(|e| e.with("transformers", "A A B"))
            .and_then(|e| e.with("responseTransformers", "A"))
            .expect("endpoint");
        let mut out = Vec::new();
        check_references(&endpoint, &path(), &resolver, &mut out);
        let names: Vec<String> = out
            .iter()
            .map(|v| match &v.kind {
                ViolationKind::UnresolvedReference { name, attribute, .. } => format!("{}:{}", attribute, name),
                other => other.to_string(),
            })
            .collect();
        assert_eq!(names, vec!["transformers:A", "transformers:B", "responseTransformers:A"]);
    }

    #[test]
    fn profile_bounds_are_warnings() {
        let profile = Node::standard(NodeKind::ThreadingProfile)
            .with("maxThreadsActive", "4")
            .and_then(|p| p.with("maxThreadsIdle", "8"))
            .expect("profile");
        let mut out = Vec::new();
        check_profile_bounds(&profile, &path(), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].severity, super::super::Severity::Warning);

        let balanced = Node::standard(NodeKind::PoolingProfile)
            .with("maxActive", "4")
            .and_then(|p| p.with("maxIdle", "4"))
            .expect("profile");
        let mut out = Vec::new();
        check_profile_bounds(&balanced, &path(), &mut out);
        assert!(out.is_empty());
    }
}
