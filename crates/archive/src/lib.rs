//! Extraction of zip-compatible archives (`.zip`, `.cbz`) into memory.
//!
//! An uploaded archive is unpacked entirely into [`SourceFile`]s keyed by
//! their in-archive path. Only entries the pipeline can use survive: page
//! images and sidecar metadata documents. Everything else (thumbnails
//! databases, nested archives, text files) is dropped.
//!
//! Entries are visited in natural filename order, so `2.jpg` lands before
//! `10.jpg` and the resulting map iterates in page order.
//!
//! [`SourceFile`]: mokuro_model::SourceFile

pub mod error;
mod extract;

pub use crate::extract::{Extracted, extract, extract_async};
