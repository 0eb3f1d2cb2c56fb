//! # Validation Module
//!
//! Whole-document validation for configuration documents. The validator walks
//! the node tree once in document pre-order with an explicit stack, applying
//! the per-node rules, then checks every global catalog. It never fails: all
//! findings come back in a [`ValidationReport`].
//!
//! Rules applied to each node:
//! - required attributes and conformance of stored values
//! - conditional requirements (endpoint `address`/`ref`, interceptor `className`/`name`)
//! - resolution of reference-bearing attributes against the catalogs
//! - mandatory child elements
//! - filter composition, each filter element against its own operands
//! - threading and pooling profile bounds (warnings)

pub mod rules;
pub mod violations;

pub use violations::{Severity, ValidationReport, Violation, ViolationKind};

use crate::domain::{ConfigurationDocument, Node, NodePath, ReferenceResolver};
use crate::schema::SchemaRegistry;
use tracing::debug;

/// Switches for the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Count warnings as errors when deciding validity.
    pub warnings_as_errors: bool,
    /// Report idle limits above active limits in profiles.
    pub check_profile_bounds: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self { warnings_as_errors: false, check_profile_bounds: true }
    }
}

/// Validates documents against a schema registry.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'r> {
    registry: &'r SchemaRegistry,
    options: ValidatorOptions,
}

impl Validator<'static> {
    /// Validator over the standard schema with default options.
    pub fn standard() -> Self {
        Self::new(SchemaRegistry::standard())
    }
}

impl<'r> Validator<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry, options: ValidatorOptions::default() }
    }

    pub fn with_options(mut self, options: ValidatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> ValidatorOptions {
        self.options
    }

    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    /// Check a whole document and collect every finding in traversal order,
    /// followed by the catalog findings.
    pub fn validate(&self, document: &ConfigurationDocument) -> ValidationReport {
        let span = crate::validation_span!("validate", document_id = document.id().unwrap_or("-"));
        let _guard = span.enter();

        let resolver = document.resolver();
        let mut violations = Vec::new();
        self.walk(document.root(), &resolver, &mut violations);
        rules::check_catalogs(document.root(), &mut violations);

        let report = ValidationReport::new(violations, self.options.warnings_as_errors);
        debug!(
            errors = report.error_count(),
            warnings = report.warning_count(),
            valid = report.is_valid(),
            "Validated configuration document"
        );
        report
    }

    fn walk(&self, root: &Node, resolver: &ReferenceResolver<'_>, out: &mut Vec<Violation>) {
        let mut pending = vec![(root, NodePath::root())];
        while let Some((node, path)) = pending.pop() {
            self.check_node(node, &path, resolver, out);

            let first_child = pending.len();
            for (spec, children) in node.child_slots() {
                for (index, child) in children.iter().enumerate() {
                    pending.push((child, path.for_child(spec, index)));
                }
            }
            pending[first_child..].reverse();
        }
    }

    fn check_node(&self, node: &Node, path: &NodePath, resolver: &ReferenceResolver<'_>, out: &mut Vec<Violation>) {
        rules::check_attributes(node, path, out);
        rules::check_conditional_attributes(node, path, out);
        rules::check_references(node, path, resolver, out);
        rules::check_required_children(node, path, self.registry, out);
        rules::check_filter_composition(node, path, out);
        if self.options.check_profile_bounds {
            rules::check_profile_bounds(node, path, out);
        }
    }
}
