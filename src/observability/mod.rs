//! # Observability Infrastructure
//!
//! Structured logging for the codec, the validator and the document store.

pub mod logging;

pub use logging::init_logging;
