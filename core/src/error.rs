//! Error types for the tasks API client.
//!
//! # Design
//! Every variant renders as the human-readable line a view shows to the user,
//! so callers at the view boundary can simply store `err.to_string()`.
//! `RequestFailed` carries the message already extracted from the response
//! body (see `client::error_message`); its `Display` is that message verbatim.

use thiserror::Error;

/// Errors returned by `TaskClient` and `TaskApi` implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// No response was received (DNS, connection refused, aborted, ...).
    #[error("{cause}")]
    TransportFailed { cause: String },

    /// The response body could not be deserialized into the expected type.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status of a `RequestFailed`, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
