//! Domain error types.

use thiserror::Error;

/// Validation errors raised when constructing value objects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("username must not be empty")]
    EmptyUsername,

    #[error("username must be at most {max} characters (got {actual})")]
    UsernameTooLong { max: usize, actual: usize },

    #[error("message content must not be empty")]
    EmptyContent,
}

/// Errors raised by message and user stores
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("username '{0}' already exists")]
    DuplicateUsername(String),

    #[error("stored data is corrupted: {0}")]
    Corrupted(String),

    #[error("storage failure: {0}")]
    Storage(String),

    /// The store could not start the operation in time; nothing was written
    #[error("store is busy")]
    Busy,
}

/// Errors raised while pushing events to connections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' is not registered")]
    ClientNotFound(String),

    #[error("failed to push to connection: {0}")]
    PushFailed(String),

    #[error("failed to serialize event: {0}")]
    Serialization(String),
}

/// Why a credential token was refused.
///
/// `Missing` only drops the offending event. `Expired` and `Invalid` close the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Token required")]
    Missing,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,
}

impl Rejection {
    /// Whether this rejection terminates the connection it arrived on.
    pub fn closes_connection(self) -> bool {
        matches!(self, Rejection::Expired | Rejection::Invalid)
    }
}

/// Errors raised while issuing a credential token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenIssueError {
    #[error("failed to encode token: {0}")]
    Encoding(String),
}
