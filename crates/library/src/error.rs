//! Library Error Types
//!
//! Each pipeline stage has its own error module. Walking and correlation
//! absorb their failures (logged, then skipped), so the only failure an
//! ingest call surfaces is a failed merge.

use derive_more::{Display, Error};

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// See the [`merge`](crate::merge::error::ErrorKind) error tree for the cause.
    #[display("failed to merge volumes into the catalog")]
    Merge,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Merge => false,
        }
    }
}
