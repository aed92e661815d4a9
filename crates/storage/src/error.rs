//! Storage Error Types

use derive_more::{Display, Error};

/// A catalog storage error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// No entry exists for the title (for operations that require one).
    #[display("title not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// An entry already exists for the title (for operations that create one).
    #[display("title already exists: {_0}")]
    AlreadyExists(#[error(not(source))] String),
    /// Store-specific failure (connection lost, quota exceeded, ...).
    #[display("backend error: {_0}")]
    Backend(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Backend(_))
    }
}
