//! Error types for the [`walk`](super) module.

use derive_more::{Display, Error};

/// A walk error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for walk operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A directory's children could not be listed.
    #[display("cannot enumerate directory: {_0}")]
    Enumerate(#[error(not(source))] String),
    /// A file's contents could not be read.
    #[display("cannot resolve file: {_0}")]
    Resolve(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        true
    }
}
