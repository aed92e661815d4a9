use crate::Context;
use crate::correlate::details::{Details, deepest, lone_sibling};
use crate::correlate::error::ErrorKind;
use exn::ResultExt;
use futures::future::BoxFuture;
use indexmap::{IndexMap, IndexSet};
use mokuro_archive::extract_async;
use mokuro_model::{FileKind, PartialVolume, SourceFile, VolumeMetadata, sort_naturally};
use std::collections::HashSet;
use tracing::instrument;

/// Which invocation of the correlator is running.
///
/// Only the outermost pass may unpack a single-archive upload and correlate
/// its contents; that nested pass treats any archive as a plain volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Outermost,
    Nested,
}

/// Candidate volumes found in one upload.
#[derive(Debug, Default)]
pub struct Correlation {
    /// Volume key (path without extension) to the volume found there, in
    /// discovery order.
    pub volumes: IndexMap<String, PartialVolume>,
    /// Every `title_uuid` seen in parsed metadata, each once, in first-seen
    /// order.
    pub titles: IndexSet<String>,
    /// Names of archives that could not be extracted.
    pub failed_archives: Vec<String>,
}

impl Correlation {
    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }
}

/// Group `files` into candidate volumes.
#[instrument(skip_all, fields(files = files.len()))]
pub async fn correlate(ctx: &Context, files: Vec<SourceFile>) -> Correlation {
    let correlation = correlate_pass(ctx, files, Pass::Outermost).await;
    tracing::debug!(volumes = correlation.volumes.len(), titles = correlation.titles.len(), "Correlated upload");
    correlation
}

fn correlate_pass(ctx: &Context, mut files: Vec<SourceFile>, pass: Pass) -> BoxFuture<'_, Correlation> {
    Box::pin(async move {
        let classifier = ctx.classifier();
        sort_naturally(&mut files, SourceFile::name);
        let single_file = files.len() == 1;
        let mut correlation = Correlation::default();

        for file in files.iter().filter(|file| classifier.classify(file) == FileKind::Metadata) {
            let details = Details::of(file);
            let metadata = VolumeMetadata::from_slice(file.data()).or_raise(|| ErrorKind::Metadata(details.path.clone()));
            match metadata {
                Ok(metadata) => {
                    tracing::trace!(path = %details.path, title = %metadata.title_uuid, volume = %metadata.volume_uuid, "Found volume metadata");
                    correlation.titles.insert(metadata.title_uuid.clone());
                    correlation.volumes.entry(details.path).or_default().attach_metadata(metadata, details.stem);
                },
                Err(e) => tracing::warn!(path = %details.path, error = ?e, "Skipping unreadable metadata"),
            }
        }

        // Volumes with images inside their own directory never take loose neighbours.
        let mut foldered = HashSet::new();
        let mut loose = vec![];
        for file in files.iter().filter(|file| classifier.classify(file) == FileKind::Image) {
            let Some(path) = file.relative_path() else {
                tracing::debug!(name = %file.name(), "Dropping image without a path");
                continue;
            };
            match deepest(correlation.volumes.keys().map(String::as_str), path) {
                Some(index) => {
                    foldered.insert(index);
                    correlation.volumes[index].attach_file(file.name(), file.clone());
                },
                None => loose.push((path, file)),
            }
        }
        for (path, file) in loose {
            match lone_sibling(correlation.volumes.keys().map(String::as_str), path) {
                Some(index) if !foldered.contains(&index) => {
                    correlation.volumes[index].attach_file(file.name(), file.clone());
                },
                _ => tracing::debug!(path = %path, "Dropping image outside any volume"),
            }
        }

        for file in files.iter().filter(|file| classifier.classify(file) == FileKind::Archive) {
            let extracted = extract_async(file.name().to_string(), file.shared_data(), classifier.clone())
                .await
                .or_raise(|| ErrorKind::Archive(file.name().to_string()));
            let extracted = match extracted {
                Ok(extracted) => extracted,
                Err(e) => {
                    tracing::error!(name = %file.name(), error = ?e, "Failed to extract archive");
                    correlation.failed_archives.push(file.name().to_string());
                    continue;
                },
            };
            if pass == Pass::Outermost && single_file {
                tracing::debug!(name = %file.name(), entries = extracted.len(), "Correlating contents of single archive");
                return correlate_pass(ctx, extracted.into_files(), Pass::Nested).await;
            }
            let details = Details::of(file);
            tracing::trace!(path = %details.path, entries = extracted.len(), "Archive is one volume");
            correlation.volumes.entry(details.path).or_default().set_files(extracted.images(classifier));
        }

        correlation
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{context, image, mokuro, zip};
    use mokuro_model::Missing;
    use mokuro_storage::MemoryStore;
    use std::sync::Arc;

    fn keys(correlation: &Correlation) -> Vec<&str> {
        correlation.volumes.keys().map(String::as_str).collect()
    }

    fn pages(correlation: &Correlation, key: &str) -> Vec<String> {
        correlation.volumes[key].files.as_ref().map(|files| files.keys().cloned().collect()).unwrap_or_default()
    }

    #[tokio::test]
    async fn test_flat_folders_are_separate_volumes() {
        let (ctx, _) = context(Arc::new(MemoryStore::default()));
        let files = vec![
            mokuro("a/info.mokuro", "title", "va"),
            image("a/1.png"),
            mokuro("b/info.mokuro", "title", "vb"),
            image("b/1.png"),
        ];
        let correlation = correlate(&ctx, files).await;
        assert_eq!(keys(&correlation), ["a/info", "b/info"]);
        assert_eq!(pages(&correlation, "a/info"), ["1.png"]);
        assert_eq!(pages(&correlation, "b/info"), ["1.png"]);
        assert_eq!(correlation.volumes["a/info"].files.as_ref().unwrap()["1.png"].relative_path(), Some("a/1.png"));
        assert_eq!(correlation.titles.iter().collect::<Vec<_>>(), ["title"]);
    }

    #[tokio::test]
    async fn test_metadata_beside_volume_directories() {
        let (ctx, _) = context(Arc::new(MemoryStore::default()));
        let files = vec![
            image("Series/vol10/1.jpg"),
            image("Series/vol1/2.jpg"),
            mokuro("Series/vol10.mokuro", "series", "v10"),
            image("Series/vol1/10.jpg"),
            mokuro("Series/vol1.mokuro", "series", "v1"),
            image("Series/vol1/1.jpg"),
        ];
        let correlation = correlate(&ctx, files).await;
        assert_eq!(keys(&correlation), ["Series/vol1", "Series/vol10"]);
        assert_eq!(pages(&correlation, "Series/vol1"), ["1.jpg", "2.jpg", "10.jpg"]);
        assert_eq!(pages(&correlation, "Series/vol10"), ["1.jpg"]);
        let volume = &correlation.volumes["Series/vol1"];
        assert_eq!(volume.volume_name.as_deref(), Some("vol1"));
        assert!(volume.is_valid());
    }

    #[tokio::test]
    async fn test_loose_images_beside_volume_folders_are_dropped() {
        let (ctx, _) = context(Arc::new(MemoryStore::default()));
        let files = vec![
            mokuro("Series/vol1.mokuro", "series", "v1"),
            image("Series/vol1/001.jpg"),
            mokuro("Series/vol2.mokuro", "series", "v2"),
            image("Series/vol2/001.jpg"),
            image("Series/cover.jpg"),
        ];
        let correlation = correlate(&ctx, files).await;
        assert_eq!(pages(&correlation, "Series/vol1"), ["001.jpg"]);
        assert_eq!(pages(&correlation, "Series/vol2"), ["001.jpg"]);
        assert_eq!(
            correlation.volumes["Series/vol1"].files.as_ref().unwrap()["001.jpg"].relative_path(),
            Some("Series/vol1/001.jpg")
        );

        // A lone volume with its own folder does not take the cover either.
        let files = vec![mokuro("Solo/vol1.mokuro", "solo", "v1"), image("Solo/vol1/001.jpg"), image("Solo/cover.jpg")];
        let correlation = correlate(&ctx, files).await;
        assert_eq!(pages(&correlation, "Solo/vol1"), ["001.jpg"]);
    }

    #[tokio::test]
    async fn test_titles_in_first_seen_order() {
        let (ctx, _) = context(Arc::new(MemoryStore::default()));
        let files = vec![
            mokuro("x/1.mokuro", "beta", "b1"),
            mokuro("x/2.mokuro", "alpha", "a1"),
            mokuro("x/3.mokuro", "beta", "b2"),
        ];
        let correlation = correlate(&ctx, files).await;
        assert_eq!(correlation.titles.iter().collect::<Vec<_>>(), ["beta", "alpha"]);
        assert_eq!(correlation.volumes.len(), 3);
    }

    #[tokio::test]
    async fn test_unusable_files_are_left_out() {
        let (ctx, _) = context(Arc::new(MemoryStore::default()));
        let files = vec![
            SourceFile::new("broken.mokuro", b"{not json".as_slice()).with_relative_path("v/broken.mokuro"),
            SourceFile::new("loose.jpg", b"img".as_slice()),
            image("elsewhere/1.jpg"),
            SourceFile::new("notes.txt", b"hi".as_slice()).with_relative_path("v/notes.txt"),
        ];
        let correlation = correlate(&ctx, files).await;
        assert!(correlation.is_empty());
        assert!(correlation.titles.is_empty());
    }

    #[tokio::test]
    async fn test_images_without_metadata_have_nowhere_to_go() {
        let (ctx, _) = context(Arc::new(MemoryStore::default()));
        let correlation = correlate(&ctx, vec![image("v/1.jpg"), image("v/2.jpg")]).await;
        assert!(correlation.is_empty());
    }

    #[tokio::test]
    async fn test_single_archive_upload_is_unpacked() {
        let (ctx, _) = context(Arc::new(MemoryStore::default()));
        let data = zip(&[
            ("vol1/2.jpg", b"two".to_vec()),
            ("vol1/info.mokuro", crate::test_support::metadata("t", "v")),
            ("vol1/1.jpg", b"one".to_vec()),
        ]);
        let correlation = correlate(&ctx, vec![SourceFile::new("vol1.cbz", data)]).await;
        assert_eq!(keys(&correlation), ["vol1/info"]);
        assert_eq!(pages(&correlation, "vol1/info"), ["1.jpg", "2.jpg"]);
        assert_eq!(correlation.volumes["vol1/info"].volume_name.as_deref(), Some("info"));
        assert_eq!(correlation.volumes["vol1/info"].missing(), None);
    }

    #[tokio::test]
    async fn test_single_archive_holding_a_whole_title() {
        let (ctx, _) = context(Arc::new(MemoryStore::default()));
        let data = zip(&[
            ("T/v1.mokuro", crate::test_support::metadata("t", "v1")),
            ("T/v1/1.jpg", b"one".to_vec()),
            ("T/v2.mokuro", crate::test_support::metadata("t", "v2")),
            ("T/v2/1.jpg", b"uno".to_vec()),
            ("T/v2/2.jpg", b"dos".to_vec()),
        ]);
        let correlation = correlate(&ctx, vec![SourceFile::new("T.zip", data)]).await;
        assert_eq!(keys(&correlation), ["T/v1", "T/v2"]);
        assert_eq!(pages(&correlation, "T/v1"), ["1.jpg"]);
        assert_eq!(pages(&correlation, "T/v2"), ["1.jpg", "2.jpg"]);
        assert_eq!(correlation.volumes["T/v2"].files.as_ref().unwrap()["1.jpg"].data(), b"uno");
        assert!(correlation.volumes.values().all(PartialVolume::is_valid));
        assert_eq!(correlation.titles.iter().collect::<Vec<_>>(), ["t"]);
    }

    #[tokio::test]
    async fn test_archive_pages_are_keyed_by_file_name() {
        let (ctx, _) = context(Arc::new(MemoryStore::default()));
        let data = zip(&[("vol1/2.jpg", b"two".to_vec()), ("vol1/1.jpg", b"one".to_vec())]);
        let files = vec![
            mokuro("T/vol1.mokuro", "t", "v1"),
            SourceFile::new("vol1.cbz", data).with_relative_path("T/vol1.cbz"),
        ];
        let correlation = correlate(&ctx, files).await;
        assert_eq!(pages(&correlation, "T/vol1"), ["1.jpg", "2.jpg"]);
        assert_eq!(correlation.volumes["T/vol1"].files.as_ref().unwrap()["1.jpg"].relative_path(), Some("vol1/1.jpg"));
    }

    #[tokio::test]
    async fn test_archive_in_a_batch_is_one_volume() {
        let (ctx, _) = context(Arc::new(MemoryStore::default()));
        let data = zip(&[
            ("10.jpg", b"ten".to_vec()),
            ("2.jpg", b"two".to_vec()),
            ("inner.mokuro", crate::test_support::metadata("other", "ignored")),
        ]);
        let files = vec![
            mokuro("T/vol1.mokuro", "t", "v1"),
            SourceFile::new("vol1.cbz", data).with_relative_path("T/vol1.cbz"),
        ];
        let correlation = correlate(&ctx, files).await;
        assert_eq!(keys(&correlation), ["T/vol1"]);
        assert_eq!(pages(&correlation, "T/vol1"), ["2.jpg", "10.jpg"]);
        assert_eq!(correlation.titles.iter().collect::<Vec<_>>(), ["t"]);
    }

    #[tokio::test]
    async fn test_archive_without_metadata_is_incomplete() {
        let (ctx, _) = context(Arc::new(MemoryStore::default()));
        let data = zip(&[("1.jpg", b"one".to_vec())]);
        let files = vec![
            SourceFile::new("vol1.zip", data).with_relative_path("T/vol1.zip"),
            mokuro("T/vol2.mokuro", "t", "v2"),
            image("T/vol2/1.jpg"),
        ];
        let correlation = correlate(&ctx, files).await;
        assert_eq!(correlation.volumes["T/vol1"].missing(), Some(Missing::Metadata));
        assert!(correlation.volumes["T/vol2"].is_valid());
    }

    #[tokio::test]
    async fn test_broken_archive_is_recorded() {
        let (ctx, _) = context(Arc::new(MemoryStore::default()));
        let files = vec![
            SourceFile::new("bad.zip", b"not a zip".as_slice()).with_relative_path("T/bad.zip"),
            mokuro("T/vol1.mokuro", "t", "v1"),
            image("T/vol1/1.jpg"),
        ];
        let correlation = correlate(&ctx, files).await;
        assert_eq!(correlation.failed_archives, ["bad.zip"]);
        assert_eq!(keys(&correlation), ["T/vol1"]);

        let correlation = correlate(&ctx, vec![SourceFile::new("bad.cbz", b"nope".as_slice())]).await;
        assert_eq!(correlation.failed_archives, ["bad.cbz"]);
        assert!(correlation.is_empty());
    }
}
