//! Archive Error Types

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The data could not be read as an archive at all. Don't retry with the
    /// same input.
    #[display("cannot open archive: {_0}")]
    Open(#[error(not(source))] String),
    /// A single entry was unreadable or had an unsafe path.
    #[display("unreadable archive entry: {_0}")]
    Entry(#[error(not(source))] String),
    /// The blocking extraction task panicked or was cancelled.
    #[display("extraction task failed")]
    Blocking,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Blocking)
    }
}
