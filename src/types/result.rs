//! Result type alias for assistant operations.

use super::error::ChatError;

/// Result type with `ChatError` as the error.
pub type Result<T> = std::result::Result<T, ChatError>;
