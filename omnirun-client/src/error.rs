//! Error types for the runtime client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the runtime control plane
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP round-trip itself failed
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The control plane answered with a non-success status code
    #[error("control plane error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// The control plane's response violated the runtime protocol,
    /// e.g. the request-id header is missing. Callers cannot report an
    /// invocation they cannot identify, so this is fatal for them.
    #[error("protocol violation: {0}")]
    Protocol(String),
}

impl ClientError {
    /// Create an API error from status code and body
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a protocol violation
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }
}
