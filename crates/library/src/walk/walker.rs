use crate::walk::entry::{Entry, EntryHandle, EntryKind};
use crate::walk::error::Result;
use futures::future::BoxFuture;
use mokuro_model::SourceFile;
use tokio::task::JoinHandle;
use tracing::instrument;

type Pending = Vec<JoinHandle<Result<SourceFile>>>;

/// Flatten `entry` into its leaf files.
///
/// A directory yields every file beneath it, each with its full path as the
/// relative path. A file given directly is returned as-is, without a
/// relative path, the way a file picker hands over individually chosen
/// files.
#[instrument(skip_all, fields(path = %entry.full_path()))]
pub async fn walk(entry: EntryHandle) -> Vec<SourceFile> {
    match entry.kind() {
        EntryKind::File => match entry.file().await {
            Ok(file) => vec![file],
            Err(e) => {
                tracing::warn!(error = ?e, "Skipping unreadable file");
                vec![]
            },
        },
        EntryKind::Directory => {
            let mut pending = Pending::new();
            descend(entry.as_ref(), &mut pending).await;
            let mut files = Vec::with_capacity(pending.len());
            for resolution in pending {
                match resolution.await {
                    Ok(Ok(file)) => files.push(file),
                    Ok(Err(e)) => tracing::warn!(error = ?e, "Skipping unreadable file"),
                    Err(e) => tracing::warn!(error = %e, "File resolution task failed"),
                }
            }
            tracing::debug!(files = files.len(), "Walked directory");
            files
        },
    }
}

/// Walk several top-level entries, concatenating their files in order.
pub async fn walk_all(entries: impl IntoIterator<Item = EntryHandle>) -> Vec<SourceFile> {
    let mut files = Vec::new();
    for entry in entries {
        files.extend(walk(entry).await);
    }
    files
}

fn descend<'a>(directory: &'a dyn Entry, pending: &'a mut Pending) -> BoxFuture<'a, ()> {
    Box::pin(async move {
        let mut reader = match directory.reader() {
            Ok(reader) => reader,
            Err(e) => {
                tracing::warn!(path = %directory.full_path(), error = ?e, "Skipping unreadable directory");
                return;
            },
        };
        loop {
            let batch = match reader.read_entries().await {
                Ok(batch) => batch,
                Err(e) => {
                    tracing::warn!(path = %directory.full_path(), error = ?e, "Stopped reading directory");
                    break;
                },
            };
            if batch.is_empty() {
                break;
            }
            tracing::trace!(path = %directory.full_path(), entries = batch.len(), "Read directory batch");
            for child in batch {
                match child.kind() {
                    // Resolved in the background; only awaited once the whole tree is listed.
                    EntryKind::File => pending.push(tokio::spawn(resolve(child))),
                    EntryKind::Directory => descend(child.as_ref(), pending).await,
                }
            }
        }
    })
}

async fn resolve(entry: EntryHandle) -> Result<SourceFile> {
    let file = entry.file().await?;
    Ok(file.with_relative_path(entry.full_path()))
}
