//! Error types for the [`merge`](super) module.

use derive_more::{Display, Error};

/// A merge error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for merge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a merge did not happen (or stopped part-way).
///
/// ### Rejected before writing
/// - [`ErrorKind::Empty`]
/// - [`ErrorKind::MissingMetadata`]
/// - [`ErrorKind::MissingImages`]
///
/// ### Dependency Errors
/// - [`ErrorKind::Storage`] - titles merged before the failure stay merged.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The upload contained no candidate volumes at all.
    #[display("no volumes found")]
    Empty,
    /// The volume at this key has no (parseable) metadata or no name.
    #[display("volume {_0} is missing its metadata")]
    MissingMetadata(#[error(not(source))] String),
    /// The volume at this key has no images.
    #[display("volume {_0} is missing its images")]
    MissingImages(#[error(not(source))] String),
    /// A catalog store operation failed.
    #[display("catalog store operation failed")]
    Storage,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage)
    }
}
