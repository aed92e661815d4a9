//! Ingestion of mokuro-processed manga into a catalog.
//!
//! The pipeline runs in four stages, each its own module:
//!
//! 1. [`walk`] flattens dropped directories into files with relative paths;
//! 2. [`correlate`] groups files into candidate volumes, unpacking archives
//!    with [`mokuro_archive`] along the way;
//! 3. [`merge`] validates the candidates and appends the new ones to the
//!    catalog held by the host's [`CatalogStore`](mokuro_storage::CatalogStore);
//! 4. the `ingest_*` functions run the stages above and notify the user of
//!    the outcome exactly once.
//!
//! Everything the host provides travels in a [`Context`].

mod context;
pub mod correlate;
pub mod error;
pub mod host;
pub mod ingest;
pub mod merge;
#[cfg(test)]
mod test_support;
pub mod walk;

pub use crate::context::{Context, DEFAULT_BATCH_SIZE, Settings};
pub use crate::ingest::{
    IngestReport, MESSAGE_MISSING_IMAGES, MESSAGE_MISSING_METADATA, MESSAGE_NO_VOLUMES, MESSAGE_STORE_FAILURE,
    MESSAGE_SUCCESS, ingest_entries, ingest_files, ingest_paths,
};
