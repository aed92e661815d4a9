//! Validation of candidate volumes and their merge into the catalog.
//!
//! A merge is all-or-nothing up to the first write: if any candidate volume
//! is incomplete, nothing is written. After that each title is merged on its
//! own, under a per-title lock, appending only volumes whose `volume_uuid`
//! the title does not already have.

pub mod error;
mod merger;

pub use self::merger::{Merged, TitleMerge, merge};
pub(crate) use self::merger::merge_inner;
