//! # Error Handling
//!
//! Error types for building, parsing and publishing configuration documents.

pub mod types;

pub use types::{MuleConfigError, Result, SourceLocation};
