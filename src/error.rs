//! Look Errors
//!
//! Failures surfaced by the persistence backends and the look parser.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Common result type for look operations
pub type LookResult<T> = Result<T, LookError>;

/// Errors reported to callers of save / fetch / destroy.
///
/// Backend failures are passed through unchanged; the look never retries.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum LookError {
    /// The local store has no record for this look
    #[error("Record not found: {namespace}/{id}")]
    NotFound { namespace: String, id: String },

    /// The remote store rejected the request or could not be reached
    #[error("Transport error: {0}")]
    Transport(String),

    /// Browser storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// A record that cannot be read as a look
    #[error("Malformed look record: {0}")]
    Malformed(String),
}

impl LookError {
    pub fn not_found(namespace: impl Into<String>, id: impl Into<String>) -> Self {
        LookError::NotFound {
            namespace: namespace.into(),
            id: id.into(),
        }
    }
}

impl From<serde_json::Error> for LookError {
    fn from(err: serde_json::Error) -> Self {
        LookError::Malformed(err.to_string())
    }
}

impl From<reqwest::Error> for LookError {
    fn from(err: reqwest::Error) -> Self {
        LookError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = LookError::not_found("edit_look", "C");
        assert_eq!(err.to_string(), "Record not found: edit_look/C");
    }

    #[test]
    fn test_transport_message_is_verbatim() {
        let err = LookError::Transport("503 Service Unavailable".to_string());
        assert_eq!(err.to_string(), "Transport error: 503 Service Unavailable");
    }
}
