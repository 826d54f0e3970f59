//! Error types for the assistant.
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `From` implementations.

use std::time::Duration;
use thiserror::Error;

/// Error type for every fallible operation in a turn.
///
/// Only `ConfigError` is fatal; the interactive loop renders every other
/// variant and moves on to the next utterance.
#[derive(Error, Debug)]
pub enum ChatError {
    /// LLM collaborator failed to produce output
    #[error("LLM request failed: {0}")]
    LlmError(String),

    /// LLM collaborator did not answer within the configured timeout
    #[error("LLM request timed out after {0:?}")]
    Timeout(Duration),

    /// Statement was rejected or failed in the data store
    #[error("Query execution failed: {0}")]
    QueryError(String),

    /// Statement refused before execution (read-only session)
    #[error("Statement rejected: {0}")]
    RejectedStatement(String),

    /// Driver-level data store error (connectivity, syntax, missing table)
    #[error("Database error: {0}")]
    StoreError(#[from] sqlx::Error),

    /// A diagnostics source (slow log, introspection, metrics) is absent
    #[error("Diagnostic unavailable: {0}")]
    DiagnosticUnavailable(String),

    /// Line editor failure
    #[error("Input error: {0}")]
    InputError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML configuration parse error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// HTTP client error (Ollama endpoint)
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ChatError {
    /// Create a query error with context.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create an LLM error with context.
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::LlmError(msg.into())
    }

    /// Create a diagnostic-unavailable error with context.
    pub fn diagnostic(msg: impl Into<String>) -> Self {
        Self::DiagnosticUnavailable(msg.into())
    }

    /// Check if the session can continue after this error.
    ///
    /// # Returns
    ///
    /// `false` only for configuration errors, which abort startup
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ConfigError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ChatError::query("Unknown column 'x'").to_string(),
            "Query execution failed: Unknown column 'x'"
        );
        assert_eq!(
            ChatError::Timeout(Duration::from_secs(30)).to_string(),
            "LLM request timed out after 30s"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ChatError = io.into();
        assert!(matches!(err, ChatError::IoError(_)));
    }

    #[test]
    fn test_only_config_errors_are_fatal() {
        assert!(ChatError::llm("boom").is_recoverable());
        assert!(ChatError::diagnostic("no log").is_recoverable());
        assert!(!ChatError::ConfigError("bad".to_string()).is_recoverable());
    }
}
