use crate::Context;
use crate::correlate::Correlation;
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::merge::error::{ErrorKind, Result};
use exn::ResultExt;
use indexmap::IndexMap;
use mokuro_model::{CatalogEntry, Missing, Volume};
use std::collections::HashSet;
use tracing::instrument;

/// Outcome of merging one title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleMerge {
    pub title_id: String,
    /// Volumes appended to the title.
    pub added: usize,
    /// Volumes left out because the title already had them (or the upload
    /// repeated them).
    pub skipped: usize,
    /// Whether the title was new to the catalog.
    pub created: bool,
}

/// Outcome of a whole merge, one entry per title in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Merged {
    pub titles: Vec<TitleMerge>,
}

impl Merged {
    pub fn added(&self) -> usize {
        self.titles.iter().map(|title| title.added).sum()
    }

    pub fn skipped(&self) -> usize {
        self.titles.iter().map(|title| title.skipped).sum()
    }
}

/// Validate every candidate volume and merge the batch into the catalog.
pub async fn merge(ctx: &Context, correlation: Correlation) -> LibraryResult<Merged> {
    merge_inner(ctx, correlation).await.or_raise(|| LibraryErrorKind::Merge)
}

#[instrument(skip_all, fields(volumes = correlation.volumes.len(), titles = correlation.titles.len()))]
pub(crate) async fn merge_inner(ctx: &Context, correlation: Correlation) -> Result<Merged> {
    let Correlation { volumes, titles, .. } = correlation;
    if volumes.is_empty() {
        exn::bail!(ErrorKind::Empty);
    }

    let mut by_title: IndexMap<String, Vec<Volume>> = titles.into_iter().map(|title| (title, vec![])).collect();
    for (path, partial) in volumes {
        let volume = match partial.validate() {
            Ok(volume) => volume,
            Err(Missing::Metadata) => exn::bail!(ErrorKind::MissingMetadata(path)),
            Err(Missing::Images) => exn::bail!(ErrorKind::MissingImages(path)),
        };
        by_title.entry(volume.title_uuid().to_string()).or_default().push(volume);
    }

    if ctx.settings().request_persistent {
        let granted = ctx.quota().request_persistent().await;
        tracing::debug!(granted, "Requested persistent storage");
    }

    let mut merged = Merged::default();
    for (title_id, batch) in by_title {
        merged.titles.push(merge_title(ctx, title_id, batch).await?);
    }
    tracing::info!(added = merged.added(), skipped = merged.skipped(), "Merged volumes into catalog");
    Ok(merged)
}

async fn merge_title(ctx: &Context, title_id: String, batch: Vec<Volume>) -> Result<TitleMerge> {
    let _guard = ctx.lock_title(&title_id).await;
    let store = ctx.store();
    let existing = store.get(&title_id).await.or_raise(|| ErrorKind::Storage)?;

    let mut seen: HashSet<String> =
        existing.iter().flat_map(CatalogEntry::volume_uuids).map(str::to_string).collect();
    let offered = batch.len();
    let novel: Vec<Volume> = batch.into_iter().filter(|volume| seen.insert(volume.volume_uuid().to_string())).collect();
    let added = novel.len();
    let skipped = offered - added;
    let created = existing.is_none();

    if novel.is_empty() {
        tracing::debug!(title = %title_id, skipped, "No new volumes for title");
        return Ok(TitleMerge { title_id, added, skipped, created: false });
    }
    match existing {
        Some(entry) => {
            let mut volumes = entry.volumes;
            volumes.extend(novel);
            store.update(&title_id, volumes).await.or_raise(|| ErrorKind::Storage)?;
        },
        None => store.add(CatalogEntry::new(title_id.clone(), novel)).await.or_raise(|| ErrorKind::Storage)?,
    }
    tracing::debug!(title = %title_id, added, skipped, created, "Merged title");
    Ok(TitleMerge { title_id, added, skipped, created })
}
