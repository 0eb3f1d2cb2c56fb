//! # Structured Logging
//!
//! Span macros for codec and validation work, and installation of the global
//! `tracing` subscriber.
//!
//! Every span carries an `operation_id` so log lines from one parse or one
//! validation run can be grouped, whether output is plain text or JSON.

use crate::config::LoggingSettings;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Create a tracing span for a codec operation.
///
/// ```rust,ignore
/// let span = codec_span!("parse", bytes = text.len());
/// ```
#[macro_export]
macro_rules! codec_span {
    ($operation:expr) => {
        tracing::debug_span!(
            "codec_operation",
            operation = %$operation,
            operation_id = %uuid::Uuid::new_v4()
        )
    };
    ($operation:expr, $($field:tt)*) => {
        tracing::debug_span!(
            "codec_operation",
            operation = %$operation,
            operation_id = %uuid::Uuid::new_v4(),
            $($field)*
        )
    };
}

/// Create a tracing span for a validation run.
#[macro_export]
macro_rules! validation_span {
    ($operation:expr) => {
        tracing::info_span!(
            "validation",
            operation = %$operation,
            operation_id = %uuid::Uuid::new_v4()
        )
    };
    ($operation:expr, $($field:tt)*) => {
        tracing::info_span!(
            "validation",
            operation = %$operation,
            operation_id = %uuid::Uuid::new_v4(),
            $($field)*
        )
    };
}

fn env_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level))
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
/// Returns `false` when a subscriber was already installed.
pub fn init_logging(settings: &LoggingSettings) -> bool {
    let installed = if settings.json {
        tracing::subscriber::set_global_default(
            FmtSubscriber::builder().with_env_filter(env_filter(settings)).json().finish(),
        )
    } else {
        tracing::subscriber::set_global_default(
            FmtSubscriber::builder().with_env_filter(env_filter(settings)).with_target(false).finish(),
        )
    };

    match installed {
        Ok(()) => {
            tracing::debug!(level = %settings.level, json = settings.json, "Logging initialised");
            true
        }
        // Subscriber already set elsewhere (e.g. integration tests).
        Err(_) => false,
    }
}
