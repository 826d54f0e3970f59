//! Tracing setup and span helpers.
//!
//! Spans follow the OpenTelemetry semantic conventions for database clients:
//! - https://opentelemetry.io/docs/specs/semconv/database/database-spans/
//!
//! **Span naming**: `db.query` for statements, `llm.generate` for model calls,
//! `turn` for one utterance.
//!
//! Logs are written to stderr so they never interleave with rendered tables.

pub mod spans;

pub use spans::{db_query_span, llm_span, record_db_metrics, turn_span};

use crate::types::{ChatError, Result};
use tracing_subscriber::EnvFilter;

/// Default filter when neither `--log-level` nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber.
///
/// # Arguments
///
/// * `level` - Explicit filter directive; overrides `RUST_LOG`
/// * `json` - Emit JSON lines instead of human-readable output
///
/// # Errors
///
/// Returns `ChatError::ConfigError` for an invalid directive or if a
/// subscriber is already installed
pub fn init_tracing(level: Option<&str>, json: bool) -> Result<()> {
    let filter = match level {
        Some(directive) => EnvFilter::try_new(directive)
            .map_err(|e| ChatError::ConfigError(format!("Invalid log level '{}': {}", directive, e)))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| ChatError::ConfigError(format!("Failed to initialize tracing: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_directive_rejected() {
        let err = init_tracing(Some("dbchat=notalevel"), false).unwrap_err();
        assert!(matches!(err, ChatError::ConfigError(_)));
    }
}
