//! Error types for session operations.

use thiserror::Error;

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Every failure is local to the call that produced it; state is left as it
/// was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Permission denied: {reason}")]
    Permission { reason: String },

    #[error("Conflict: {reason}")]
    Conflict { reason: String },
}

impl SessionError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn room_not_found(id: impl Into<String>) -> Self {
        Self::NotFound { entity: "Room", id: id.into() }
    }

    pub fn message_not_found(id: impl Into<String>) -> Self {
        Self::NotFound { entity: "Message", id: id.into() }
    }

    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::NotFound { entity: "User", id: id.into() }
    }

    pub fn permission(reason: impl Into<String>) -> Self {
        Self::Permission { reason: reason.into() }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict { reason: reason.into() }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_permission(&self) -> bool {
        matches!(self, Self::Permission { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<String> for SessionError {
    /// Validators in `huddle_shared` report failures as plain strings.
    fn from(message: String) -> Self {
        Self::Validation { message }
    }
}
