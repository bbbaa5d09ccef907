use thiserror::Error;

use crate::store::{EntityKind, Scope, StatusError};
use crate::transport::TransportError;

/// Errors returned by the entity repositories and the auth API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Status(#[from] StatusError),

    /// Rejected locally: the store already holds an entity with this key.
    #[error("{kind} '{key}' already exists")]
    Duplicate { kind: EntityKind, key: String },

    #[error("Blocking content requires a moderator account")]
    Forbidden,

    #[error("Listing {kind} by {scope:?} is not supported")]
    UnsupportedScope { kind: EntityKind, scope: Scope },
}

impl ApiError {
    /// Get error type string for logs and CLI output
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Transport(err) => err.error_type(),
            ApiError::Status(_) => "status_error",
            ApiError::Duplicate { .. } => "conflict_error",
            ApiError::Forbidden => "forbidden",
            ApiError::UnsupportedScope { .. } => "invalid_request",
        }
    }

    /// Whether the user has to sign in again.
    pub fn is_session_expired(&self) -> bool {
        matches!(
            self,
            ApiError::Transport(TransportError::SessionExpired { .. })
        )
    }
}
