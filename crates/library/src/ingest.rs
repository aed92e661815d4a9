//! The public entry points: correlate an upload, merge it, tell the user.

use crate::Context;
use crate::correlate::correlate;
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::merge::error::{ErrorKind as MergeErrorKind, Result as MergeResult};
use crate::merge::{Merged, merge_inner};
use crate::walk::{EntryHandle, LocalEntry, walk_all};
use exn::ResultExt;
use mokuro_model::SourceFile;
use std::path::Path;
use tracing::instrument;

pub const MESSAGE_SUCCESS: &str = "Catalog updated successfully";
pub const MESSAGE_NO_VOLUMES: &str = "No volumes found";
pub const MESSAGE_MISSING_METADATA: &str = "Missing .mokuro file";
pub const MESSAGE_MISSING_IMAGES: &str = "Missing image files";
pub const MESSAGE_STORE_FAILURE: &str = "Failed to update catalog";

/// What an ingest did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub merged: Merged,
    /// Archives that could not be extracted and were left out.
    pub failed_archives: Vec<String>,
}

/// Ingest an upload of loose files.
///
/// Emits exactly one notification through the context's notifier, whatever
/// the outcome.
#[instrument(skip_all, fields(files = files.len()))]
pub async fn ingest_files(ctx: &Context, files: Vec<SourceFile>) -> LibraryResult<IngestReport> {
    let correlation = correlate(ctx, files).await;
    let failed_archives = correlation.failed_archives.clone();
    let result = merge_inner(ctx, correlation).await;
    ctx.notifier().notify(notification(&result));
    match result {
        Ok(merged) => Ok(IngestReport { merged, failed_archives }),
        Err(e) => {
            tracing::warn!(error = ?e, "Ingest failed");
            Err(e).or_raise(|| LibraryErrorKind::Merge)
        },
    }
}

/// Walk `entries` and ingest every file found.
pub async fn ingest_entries(ctx: &Context, entries: impl IntoIterator<Item = EntryHandle>) -> LibraryResult<IngestReport> {
    let files = walk_all(entries).await;
    ingest_files(ctx, files).await
}

/// Ingest local paths: directories are walked, plain files are taken as
/// individually selected files. Paths that cannot be opened are logged and
/// left out.
pub async fn ingest_paths(
    ctx: &Context,
    paths: impl IntoIterator<Item = impl AsRef<Path>>,
) -> LibraryResult<IngestReport> {
    let mut entries: Vec<EntryHandle> = vec![];
    for path in paths {
        let path = path.as_ref();
        match LocalEntry::open(path).await {
            Ok(entry) => entries.push(Box::new(entry.with_batch_size(ctx.settings().batch_size))),
            Err(e) => tracing::warn!(path = %path.display(), error = ?e, "Skipping unreadable path"),
        }
    }
    ingest_entries(ctx, entries).await
}

fn notification(result: &MergeResult<Merged>) -> &'static str {
    let Err(e) = result else {
        return MESSAGE_SUCCESS;
    };
    match &**e {
        MergeErrorKind::Empty => MESSAGE_NO_VOLUMES,
        MergeErrorKind::MissingMetadata(_) => MESSAGE_MISSING_METADATA,
        MergeErrorKind::MissingImages(_) => MESSAGE_MISSING_IMAGES,
        MergeErrorKind::Storage => MESSAGE_STORE_FAILURE,
    }
}
