//! Builders shared by the unit tests.

use crate::Context;
use crate::host::RecordingNotifier;
use async_trait::async_trait;
use mokuro_model::{CatalogEntry, SourceFile, Volume, base_name};
use mokuro_storage::error::{ErrorKind as StorageErrorKind, Result as StorageResult};
use mokuro_storage::{CatalogStore, StoreHandle};
use std::io::{Cursor, Write};
use std::sync::Arc;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A metadata document with a little payload besides the ids.
pub(crate) fn metadata(title: &str, volume: &str) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "version": "0.2.1",
        "title": "Some Manga",
        "title_uuid": title,
        "volume": volume,
        "volume_uuid": volume,
        "pages": [],
    }))
    .unwrap()
}

pub(crate) fn mokuro(path: &str, title: &str, volume: &str) -> SourceFile {
    SourceFile::new(base_name(path), metadata(title, volume)).with_relative_path(path)
}

pub(crate) fn image(path: &str) -> SourceFile {
    SourceFile::new(base_name(path), vec![0xFF, 0xD8, 0xFF]).with_relative_path(path)
}

pub(crate) fn zip(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, data) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// A context over `store` that records its notifications and skips the
/// storage quota request.
pub(crate) fn context(store: StoreHandle) -> (Context, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let ctx = Context::new(store).with_notifier(notifier.clone());
    (ctx, notifier)
}

/// A store that can be read but refuses every write.
pub(crate) struct ReadOnlyStore;

#[async_trait]
impl CatalogStore for ReadOnlyStore {
    fn name(&self) -> &str {
        "read-only"
    }

    async fn get(&self, _title_id: &str) -> StorageResult<Option<CatalogEntry>> {
        Ok(None)
    }

    async fn add(&self, _entry: CatalogEntry) -> StorageResult<()> {
        exn::bail!(StorageErrorKind::Backend("read-only store".to_string()));
    }

    async fn update(&self, _title_id: &str, _volumes: Vec<Volume>) -> StorageResult<()> {
        exn::bail!(StorageErrorKind::Backend("read-only store".to_string()));
    }

    async fn list(&self) -> StorageResult<Vec<String>> {
        Ok(vec![])
    }
}
