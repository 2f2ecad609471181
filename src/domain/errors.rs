//! Domain errors for the official description cache and review store.

use thiserror::Error;

/// Domain-level errors.
///
/// Business-level absence (blank code, unknown code, remote outage with a
/// cached fallback) is never reported through this type; lookups return
/// `Ok(None)` or the stale entry instead.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Classification not found: {0}")]
    ClassificationNotFound(i64),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        Self::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Failure of the remote lookup service.
#[derive(Debug, Error)]
pub enum RemoteLookupError {
    /// Connection, DNS or TLS failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request exceeded its time budget
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Any status other than 200
    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The body could not be read or parsed
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl RemoteLookupError {
    /// Returns true if a later attempt might succeed
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout(_) => true,
            Self::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
            Self::InvalidPayload(_) => false,
        }
    }
}
