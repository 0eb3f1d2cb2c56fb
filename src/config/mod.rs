//! # Configuration Management
//!
//! Settings for the codec, the validator and logging, loaded from an
//! optional file and the environment.

pub mod settings;

pub use settings::{CodecSettings, LoggingSettings, Settings, ValidationSettings, ENV_PREFIX};
