//! Error types for the client.

use thiserror::Error;

/// Errors surfaced by the client.
///
/// Bulk partial failures are not represented here; they are reported as
/// data inside [`BulkResult`](crate::bulk::BulkResult).
#[derive(Error, Debug)]
pub enum TernError {
    /// Connection, TLS, or timeout failure before a response was read.
    #[error("transport error: {0}")]
    Transport(String),

    /// The addressed document or index does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A version or write-condition check failed on the engine.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A document could not be serialized to (or deserialized from) the
    /// wire format, or a field value contradicts the declared mapping.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The engine answered with a body the client cannot interpret.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The engine rejected the request (an HTTP status outside the
    /// typed cases), with the reason extracted from the error body.
    #[error("engine rejected request ({status}): {reason}")]
    Server { status: u16, reason: String },

    /// A caller-supplied argument was rejected before any request was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The client configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TernError {
    pub fn transport(msg: impl Into<String>) -> Self {
        TernError::Transport(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        TernError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        TernError::Conflict(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        TernError::Encoding(msg.into())
    }

    pub fn malformed_response(msg: impl Into<String>) -> Self {
        TernError::MalformedResponse(msg.into())
    }

    pub fn server(status: u16, reason: impl Into<String>) -> Self {
        TernError::Server {
            status,
            reason: reason.into(),
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        TernError::InvalidArgument(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        TernError::InvalidConfig(msg.into())
    }
}

impl From<reqwest::Error> for TernError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TernError::Transport(format!("request timed out: {e}"))
        } else if e.is_connect() {
            TernError::Transport(format!("connection failed: {e}"))
        } else if e.is_decode() {
            TernError::MalformedResponse(e.to_string())
        } else {
            TernError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for TernError {
    fn from(e: serde_json::Error) -> Self {
        TernError::Encoding(e.to_string())
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TernError>;
