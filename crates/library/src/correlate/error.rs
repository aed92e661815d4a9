//! Error types for the [`correlate`](super) module.
//!
//! These never escape correlation; they exist to give logged failures a
//! consistent shape.

use derive_more::{Display, Error};

/// A correlation error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for correlation operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A sidecar metadata document could not be parsed.
    #[display("invalid metadata document: {_0}")]
    Metadata(#[error(not(source))] String),
    /// An archive could not be extracted.
    #[display("cannot extract archive: {_0}")]
    Archive(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
