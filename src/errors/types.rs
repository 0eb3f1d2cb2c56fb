//! # Error Types
//!
//! Construction-time error types for the configuration model using `thiserror`.
//! Problems found by the validator are not errors; they are reported as data in
//! a [`ValidationReport`](crate::validation::ValidationReport).

use crate::schema::NodeKind;
use crate::validation::ValidationReport;
use serde::Serialize;
use std::fmt;

/// Custom result type for configuration model operations
pub type Result<T> = std::result::Result<T, MuleConfigError>;

/// Position in a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SourceLocation {
    /// 1-based line number
    pub line: u64,
    /// 1-based column number
    pub column: u64,
    /// Byte offset from the start of the document
    pub offset: u64,
}

impl SourceLocation {
    /// Compute the line and column of a byte offset in `text`.
    pub fn from_offset(text: &str, offset: u64) -> Self {
        let end = usize::try_from(offset).unwrap_or(usize::MAX).min(text.len());
        let mut line = 1;
        let mut column = 1;
        for (index, ch) in text.char_indices() {
            if index >= end {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self { line, column, offset }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Main error type for the configuration model
#[derive(thiserror::Error, Debug)]
pub enum MuleConfigError {
    /// An enumerated attribute received a literal outside its domain
    #[error("Invalid value '{value}' for {kind}.{attribute}")]
    InvalidEnumValue { kind: NodeKind, attribute: String, value: String },

    /// An attribute received a value of the wrong type
    #[error("Invalid value '{value}' for {kind}.{attribute}: expected {expected}")]
    InvalidAttributeValue { kind: NodeKind, attribute: String, value: String, expected: String },

    /// The attribute is not declared for this kind
    #[error("Unknown attribute '{attribute}' on {kind}")]
    UnknownAttribute { kind: NodeKind, attribute: String },

    /// The element is not a declared child role of its parent
    #[error("Unknown element <{element}> inside {parent}")]
    UnknownElement { parent: String, element: String },

    /// The child role is not declared for this kind, or the child has the wrong kind
    #[error("{kind} does not allow a '{role}' child here")]
    DisallowedChild { kind: NodeKind, role: String },

    /// A single-valued role already holds a child
    #[error("{kind} allows at most one '{role}' child")]
    CardinalityExceeded { kind: NodeKind, role: String },

    /// The document text cannot be read as a configuration document
    #[error("Malformed document at {location}: {message}")]
    MalformedDocument { location: SourceLocation, message: String },

    /// The node tree is nested deeper than the codec writes
    #[error("Document nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: String,
    },

    /// The document store refused a document that did not validate
    #[error("Document rejected: {} validation error(s)", report.error_count())]
    Rejected { report: Box<ValidationReport> },
}

impl MuleConfigError {
    /// Create an invalid enum value error
    pub fn invalid_enum<A: Into<String>, V: Into<String>>(kind: NodeKind, attribute: A, value: V) -> Self {
        Self::InvalidEnumValue { kind, attribute: attribute.into(), value: value.into() }
    }

    /// Create an invalid attribute value error
    pub fn invalid_value<A, V, E>(kind: NodeKind, attribute: A, value: V, expected: E) -> Self
    where
        A: Into<String>,
        V: Into<String>,
        E: Into<String>,
    {
        Self::InvalidAttributeValue {
            kind,
            attribute: attribute.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Create an unknown attribute error
    pub fn unknown_attribute<A: Into<String>>(kind: NodeKind, attribute: A) -> Self {
        Self::UnknownAttribute { kind, attribute: attribute.into() }
    }

    /// Create an unknown element error
    pub fn unknown_element<P: Into<String>, E: Into<String>>(parent: P, element: E) -> Self {
        Self::UnknownElement { parent: parent.into(), element: element.into() }
    }

    /// Create a disallowed child error
    pub fn disallowed_child<R: Into<String>>(kind: NodeKind, role: R) -> Self {
        Self::DisallowedChild { kind, role: role.into() }
    }

    /// Create a cardinality error
    pub fn cardinality_exceeded<R: Into<String>>(kind: NodeKind, role: R) -> Self {
        Self::CardinalityExceeded { kind, role: role.into() }
    }

    /// Create a malformed document error
    pub fn malformed<S: Into<String>>(location: SourceLocation, message: S) -> Self {
        Self::MalformedDocument { location, message: message.into() }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(source) }
    }

    /// Create an I/O error with context
    pub fn io<S: Into<String>>(source: std::io::Error, context: S) -> Self {
        Self::Io { source, context: context.into() }
    }

    /// Create a rejection carrying the failed validation report
    pub fn rejected(report: ValidationReport) -> Self {
        Self::Rejected { report: Box::new(report) }
    }

    /// Location of a malformed document error, if any
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            MuleConfigError::MalformedDocument { location, .. } => Some(*location),
            _ => None,
        }
    }
}

// Error conversions for common external error types
impl From<std::io::Error> for MuleConfigError {
    fn from(error: std::io::Error) -> Self {
        Self::Io { source: error, context: "I/O operation failed".to_string() }
    }
}

impl From<serde_json::Error> for MuleConfigError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization { source: error, context: "JSON serialization failed".to_string() }
    }
}

impl From<config::ConfigError> for MuleConfigError {
    fn from(error: config::ConfigError) -> Self {
        Self::config_with_source("Configuration loading failed", Box::new(error))
    }
}

impl From<validator::ValidationErrors> for MuleConfigError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string()))
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self::config(format!("Settings validation failed: {}", message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = MuleConfigError::config("Test configuration error");
        assert!(matches!(error, MuleConfigError::Config { .. }));
        assert_eq!(error.to_string(), "Configuration error: Test configuration error");
    }

    #[test]
    fn test_enum_error_message() {
        let error = MuleConfigError::invalid_enum(NodeKind::ThreadingProfile, "poolExhaustedAction", "EXPLODE");
        assert_eq!(error.to_string(), "Invalid value 'EXPLODE' for ThreadingProfile.poolExhaustedAction");
    }

    #[test]
    fn test_location_from_offset() {
        let text = "<a>\n  <b/>\n</a>";
        let location = SourceLocation::from_offset(text, 6);
        assert_eq!(location.line, 2);
        assert_eq!(location.column, 3);
        assert_eq!(location.offset, 6);

        let error = MuleConfigError::malformed(location, "unexpected element");
        assert_eq!(error.location(), Some(location));
        assert_eq!(error.to_string(), "Malformed document at line 2, column 3: unexpected element");
    }

    #[test]
    fn test_location_offset_past_end_is_clamped() {
        let location = SourceLocation::from_offset("ab", 99);
        assert_eq!(location.line, 1);
        assert_eq!(location.column, 3);
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: MuleConfigError = io_error.into();
        assert!(matches!(error, MuleConfigError::Io { .. }));

        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error: MuleConfigError = json_error.into();
        assert!(matches!(error, MuleConfigError::Serialization { .. }));
    }
}
