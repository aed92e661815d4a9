//! Data model for mokuro volume ingestion.
//!
//! Everything the ingestion pipeline passes between its stages lives here:
//!
//! - [`SourceFile`]: an uploaded file (name, optional relative path,
//!   optional declared mime type, contents),
//! - [`VolumeMetadata`]: the sidecar `.mokuro` document, reduced to the two
//!   identifiers the pipeline cares about plus an opaque payload,
//! - [`PartialVolume`] / [`Volume`]: a volume under construction and a
//!   validated one,
//! - [`CatalogEntry`]: a title and its volumes, as held by a catalog store,
//! - [`Classifier`]: the rules deciding whether a file is metadata, an
//!   image or an archive.
//!
//! Helpers for natural ("human") filename ordering and for normalising
//! relative paths are shared by the extractor and the correlator.

mod catalog;
pub mod error;
mod file;
mod kind;
mod metadata;
mod path;
mod sort;
mod volume;

pub use crate::catalog::CatalogEntry;
pub use crate::file::SourceFile;
pub use crate::kind::{Classifier, FileKind};
pub use crate::metadata::VolumeMetadata;
pub use crate::path::{base_name, dir_name, normalize_relative};
pub use crate::sort::{natural_cmp, sort_naturally};
pub use crate::volume::{Missing, PartialVolume, Volume, VolumeFiles};
