//! # mule-config
//!
//! A typed model of Mule 1.x `mule-configuration` documents: a static schema
//! registry describing every element kind, tri-state attributes that tell
//! "never written" apart from "explicitly unset", a lossless XML codec, a
//! whole-document validator and typed read views over a validated document.
//!
//! ## Architecture
//!
//! ```text
//! XML text ──► Codec::parse ──► ConfigurationDocument ──► Validator::validate ──► ValidationReport
//!                   ▲                    │
//!                   │                    ├─► typed views (descriptors, routers, endpoints, profiles)
//! Codec::serialize ◄┘                    └─► DocumentStore::publish (validated snapshots)
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use mule_config::{Codec, Result, Validator};
//!
//! fn check(text: &str) -> Result<bool> {
//!     let document = Codec::standard().parse(text)?;
//!     let report = Validator::standard().validate(&document);
//!     for violation in &report {
//!         println!("{}", violation);
//!     }
//!     Ok(report.is_valid())
//! }
//! ```

pub mod cli;
pub mod codec;
pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod schema;
pub mod validation;

// Re-export commonly used types and traits
pub use codec::{Codec, CodecOptions};
pub use config::Settings;
pub use domain::{ConfigurationDocument, DocumentBuilder, DocumentStore, FilterExpression, Node};
pub use errors::{MuleConfigError, Result};
pub use schema::{NodeKind, SchemaRegistry};
pub use validation::{ValidationReport, Validator, ValidatorOptions};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_available() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "mule-config");
    }
}
