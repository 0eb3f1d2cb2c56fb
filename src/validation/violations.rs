//! # Validation Findings
//!
//! Validation problems are data, not errors: every finding is a [`Violation`]
//! with the path of the offending node, a severity and a typed kind. A
//! [`ValidationReport`] collects all of them in traversal order.

use crate::domain::NodePath;
use crate::schema::{NodeKind, ReferenceKind};
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What is wrong with a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViolationKind {
    #[error("{kind} is missing required attribute '{attribute}'")]
    MissingRequiredAttribute { kind: NodeKind, attribute: String },

    #[error("'{value}' is not a valid value for {kind}.{attribute}")]
    InvalidEnumValue { kind: NodeKind, attribute: String, value: String },

    #[error("'{value}' is not a valid value for {kind}.{attribute}: expected {expected}")]
    InvalidAttributeValue { kind: NodeKind, attribute: String, value: String, expected: String },

    #[error("{attribute} refers to unknown {kind} '{name}'")]
    UnresolvedReference { kind: ReferenceKind, name: String, attribute: String },

    #[error("{kind} '{name}' is declared more than once")]
    DuplicateName { kind: ReferenceKind, name: String },

    #[error("endpoint has both ref '{reference}' and address '{address}'")]
    AmbiguousEndpointDefinition { reference: String, address: String },

    #[error("{kind} requires a '{role}' element")]
    MissingRequiredElement { kind: NodeKind, role: String },

    #[error("invalid filter composition: {reason}")]
    InvalidFilterComposition { reason: String },

    #[error("{attribute} ({value}) exceeds {limit_attribute} ({limit})")]
    ProfileBounds { kind: NodeKind, attribute: String, value: i64, limit_attribute: String, limit: i64 },

    #[error("{kind} name '{name}' contains whitespace and cannot be referenced from a name list")]
    InvalidName { kind: ReferenceKind, name: String },
}

impl ViolationKind {
    /// Stable identifier of the rule that produced the finding.
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::MissingRequiredAttribute { .. } => "missing_required_attribute",
            ViolationKind::InvalidEnumValue { .. } => "invalid_enum_value",
            ViolationKind::InvalidAttributeValue { .. } => "invalid_attribute_value",
            ViolationKind::UnresolvedReference { .. } => "unresolved_reference",
            ViolationKind::DuplicateName { .. } => "duplicate_name",
            ViolationKind::AmbiguousEndpointDefinition { .. } => "ambiguous_endpoint_definition",
            ViolationKind::MissingRequiredElement { .. } => "missing_required_element",
            ViolationKind::InvalidFilterComposition { .. } => "invalid_filter_composition",
            ViolationKind::ProfileBounds { .. } => "profile_bounds",
            ViolationKind::InvalidName { .. } => "invalid_name",
        }
    }

    /// Severity the rule reports at.
    pub fn default_severity(&self) -> Severity {
        match self {
            ViolationKind::ProfileBounds { .. } | ViolationKind::InvalidName { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: NodePath,
    pub severity: Severity,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new(path: NodePath, kind: ViolationKind) -> Self {
        Self { path, severity: kind.default_severity(), kind }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}: {}", self.severity, self.kind.code(), self.path, self.kind)
    }
}

/// All findings for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<Violation>,
    warnings_as_errors: bool,
}

impl ValidationReport {
    pub fn new(violations: Vec<Violation>, warnings_as_errors: bool) -> Self {
        Self { violations, warnings_as_errors }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }

    /// Severity a finding counts with, after warning promotion.
    pub fn effective_severity(&self, violation: &Violation) -> Severity {
        if self.warnings_as_errors {
            Severity::Error
        } else {
            violation.severity
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| self.effective_severity(v) == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| self.effective_severity(v) == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// A document is valid when no finding counts as an error.
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Findings produced by one rule.
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations.iter().filter(move |v| v.kind.code() == code)
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

impl Serialize for ValidationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationReport", 4)?;
        state.serialize_field("valid", &self.is_valid())?;
        state.serialize_field("errors", &self.error_count())?;
        state.serialize_field("warnings", &self.warning_count())?;
        state.serialize_field("violations", &self.violations)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Violation {
        Violation::new(
            NodePath::root().child("mule-environment-properties", None).child("threading-profile", Some(0)),
            ViolationKind::ProfileBounds {
                kind: NodeKind::ThreadingProfile,
                attribute: "maxThreadsIdle".to_string(),
                value: 20,
                limit_attribute: "maxThreadsActive".to_string(),
                limit: 10,
            },
        )
    }

    fn missing() -> Violation {
        Violation::new(
            NodePath::root().child("connector", Some(0)),
            ViolationKind::MissingRequiredAttribute { kind: NodeKind::Connector, attribute: "name".to_string() },
        )
    }

    #[test]
    fn warnings_do_not_invalidate_unless_promoted() {
        let report = ValidationReport::new(vec![bounds()], false);
        assert!(report.is_valid());
        assert_eq!(report.warning_count(), 1);

        let promoted = ValidationReport::new(vec![bounds()], true);
        assert!(!promoted.is_valid());
        assert_eq!(promoted.error_count(), 1);
    }

    #[test]
    fn display_includes_code_and_path() {
        assert_eq!(
            missing().to_string(),
            "error [missing_required_attribute] mule-configuration/connector[0]: Connector is missing required attribute 'name'"
        );
    }

    #[test]
    fn serializes_with_summary() {
        let report = ValidationReport::new(vec![missing(), bounds()], false);
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["valid"], false);
        assert_eq!(json["errors"], 1);
        assert_eq!(json["warnings"], 1);
        assert_eq!(json["violations"][0]["type"], "missing_required_attribute");
        assert_eq!(json["violations"][0]["path"], "mule-configuration/connector[0]");
        assert_eq!(json["violations"][0]["attribute"], "name");
        assert_eq!(report.with_code("profile_bounds").count(), 1);
    }
}
