//! Error types for remote document store operations.
//!
//! Kept transport-agnostic: the HTTP layer maps its client errors into these
//! variants, and callers decide policy (retry now, leave the pending flag for
//! the outbox, surface) without ever seeing a transport type.

use thiserror::Error;

/// Result type alias for remote store operations.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Errors that can occur while talking to the remote document store.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RemoteError {
    /// The device is offline or the call timed out before reaching the API.
    #[error("Offline or unreachable: {0}")]
    Offline(String),

    /// API error response from the remote service.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A transaction or update referenced a document that does not exist.
    #[error("Missing document {collection}/{id}")]
    MissingDocument { collection: String, id: String },

    /// Payload could not be serialized or the response could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RemoteError {
    /// Create an offline/unreachable error.
    pub fn offline(message: impl Into<String>) -> Self {
        Self::Offline(message.into())
    }

    /// Create an API error from status and message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a missing-document error.
    pub fn missing_document(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::MissingDocument {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// True when the failure is connectivity rather than a rejected request.
    pub fn is_offline(&self) -> bool {
        matches!(self, RemoteError::Offline(_))
    }
}
