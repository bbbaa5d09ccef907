//! Error types and classification for the authenticated transport.
//!
//! Failed responses are classified from their status code and typed error
//! payload so callers can tell a recoverable token expiry apart from a
//! terminal session loss or an ordinary server error.

use serde::Deserialize;
use thiserror::Error;

/// Discriminator the API puts in the body of a request rejected for an
/// expired access token.
pub const TOKEN_EXPIRED: &str = "token expired";

/// Errors that can occur while talking to the forum API.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The access token was rejected as expired. Recovered by a refresh.
    #[error("Access token expired")]
    TokenExpired,

    /// The refresh exchange failed; the user has to sign in again.
    #[error("Session expired")]
    SessionExpired {
        #[source]
        source: Option<Box<TransportError>>,
    },

    /// The server rejected the request as conflicting (e.g. duplicate name).
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Any other non-success response.
    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },

    /// Failed to reach the server.
    #[error("Connection failed: {source}")]
    Network {
        #[source]
        source: reqwest::Error,
    },

    /// Request exceeded the configured timeout
    #[error("Request timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Body could not be encoded or decoded as JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The request scope was cancelled before the response was applied.
    #[error("Request cancelled")]
    Cancelled,
}

/// Typed error payload returned by the API.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl TransportError {
    /// Classify a non-success response.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();

        if parsed.kind.as_deref() == Some(TOKEN_EXPIRED) {
            return TransportError::TokenExpired;
        }

        let message = parsed
            .message
            .or(parsed.kind)
            .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());

        if status == 409 {
            TransportError::Conflict { message }
        } else {
            TransportError::Server { status, message }
        }
    }

    /// Whether this error is recoverable by refreshing the access token.
    pub fn is_token_expired(&self) -> bool {
        matches!(self, TransportError::TokenExpired)
    }

    /// Get error type string for logs and CLI output
    pub fn error_type(&self) -> &'static str {
        match self {
            TransportError::TokenExpired => "token_expired",
            TransportError::SessionExpired { .. } => "session_expired",
            TransportError::Conflict { .. } => "conflict_error",
            TransportError::Server { .. } => "server_error",
            TransportError::Network { .. } => "network_error",
            TransportError::Timeout { .. } => "timeout",
            TransportError::Json(_) => "json_error",
            TransportError::InvalidRequest(_) => "invalid_request",
            TransportError::Cancelled => "cancelled",
        }
    }
}
