//! Entries backed by the local file system.

use crate::walk::entry::{Entry, EntryHandle, EntryKind, EntryReader, join_path};
use crate::walk::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use mokuro_model::SourceFile;
use std::path::{Path, PathBuf};
use tokio::fs::ReadDir;

/// A file or directory on disk.
///
/// The walk root's full path is its own name, so walking `/home/me/Series`
/// yields `Series/vol1/001.jpg` and never leaks the absolute location.
/// Symbolic links are followed; anything that is neither a file nor a
/// directory (sockets, devices) is skipped.
#[derive(Debug, Clone)]
pub struct LocalEntry {
    path: PathBuf,
    name: String,
    full_path: String,
    kind: EntryKind,
    batch_size: usize,
}

impl LocalEntry {
    /// Open a walk root.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let path = tokio::fs::canonicalize(path).await.or_raise(|| ErrorKind::Resolve(display.clone()))?;
        let metadata = tokio::fs::metadata(&path).await.or_raise(|| ErrorKind::Resolve(display.clone()))?;
        let Some(kind) = kind_of(&metadata) else {
            exn::bail!(ErrorKind::Resolve(display));
        };
        let name = path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
        Ok(Self { full_path: name.clone(), name, path, kind, batch_size: crate::DEFAULT_BATCH_SIZE })
    }

    /// Entries read per directory batch, for this directory and everything
    /// below it. Clamped to at least one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn kind_of(metadata: &std::fs::Metadata) -> Option<EntryKind> {
    if metadata.is_dir() {
        Some(EntryKind::Directory)
    } else if metadata.is_file() {
        Some(EntryKind::File)
    } else {
        None
    }
}

#[async_trait]
impl Entry for LocalEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn full_path(&self) -> &str {
        &self.full_path
    }

    fn kind(&self) -> EntryKind {
        self.kind
    }

    fn reader(&self) -> Result<Box<dyn EntryReader>> {
        if self.kind != EntryKind::Directory {
            exn::bail!(ErrorKind::Enumerate(self.full_path.clone()));
        }
        Ok(Box::new(LocalReader {
            directory: self.path.clone(),
            full_path: self.full_path.clone(),
            batch_size: self.batch_size,
            read_dir: None,
        }))
    }

    async fn file(&self) -> Result<SourceFile> {
        let data = tokio::fs::read(&self.path).await.or_raise(|| ErrorKind::Resolve(self.full_path.clone()))?;
        Ok(SourceFile::new(self.name.clone(), data))
    }
}

struct LocalReader {
    directory: PathBuf,
    full_path: String,
    batch_size: usize,
    read_dir: Option<ReadDir>,
}

#[async_trait]
impl EntryReader for LocalReader {
    async fn read_entries(&mut self) -> Result<Vec<EntryHandle>> {
        if self.read_dir.is_none() {
            let read_dir =
                tokio::fs::read_dir(&self.directory).await.or_raise(|| ErrorKind::Enumerate(self.full_path.clone()))?;
            self.read_dir = Some(read_dir);
        }
        let Some(read_dir) = self.read_dir.as_mut() else {
            return Ok(vec![]);
        };

        let mut batch: Vec<EntryHandle> = Vec::with_capacity(self.batch_size);
        while batch.len() < self.batch_size {
            let Some(dirent) =
                read_dir.next_entry().await.or_raise(|| ErrorKind::Enumerate(self.full_path.clone()))?
            else {
                break;
            };
            let name = dirent.file_name().to_string_lossy().into_owned();
            let full_path = join_path(&self.full_path, &name);
            // Follows symbolic links, unlike `DirEntry::file_type()`.
            let kind = match tokio::fs::metadata(dirent.path()).await {
                Ok(metadata) => kind_of(&metadata),
                Err(e) => {
                    tracing::warn!(path = %full_path, error = %e, "Skipping entry without metadata");
                    continue;
                },
            };
            let Some(kind) = kind else {
                tracing::debug!(path = %full_path, "Skipping special file");
                continue;
            };
            batch.push(Box::new(LocalEntry { path: dirent.path(), name, full_path, kind, batch_size: self.batch_size }));
        }
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walk::walk;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let root = TempDir::new().unwrap();
        let series = root.path().join("Series");
        fs::create_dir_all(series.join("vol1")).unwrap();
        fs::create_dir_all(series.join("vol2/nested")).unwrap();
        fs::write(series.join("vol1.mokuro"), b"{}").unwrap();
        fs::write(series.join("vol2.mokuro"), b"{}").unwrap();
        for page in ["001.jpg", "002.jpg", "003.jpg"] {
            fs::write(series.join("vol1").join(page), page).unwrap();
        }
        fs::write(series.join("vol2/001.png"), b"p").unwrap();
        fs::write(series.join("vol2/nested/deep.webp"), b"w").unwrap();
        root
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(100)]
    #[tokio::test]
    async fn test_walk_local_directory(#[case] batch_size: usize) {
        let root = tree();
        let entry = LocalEntry::open(root.path().join("Series")).await.unwrap().with_batch_size(batch_size);
        assert_eq!(entry.kind(), EntryKind::Directory);
        assert_eq!(entry.full_path(), "Series");

        let files = walk(Box::new(entry)).await;
        let mut paths: Vec<_> = files.iter().filter_map(SourceFile::relative_path).collect();
        paths.sort_unstable();
        assert_eq!(
            paths,
            [
                "Series/vol1.mokuro",
                "Series/vol1/001.jpg",
                "Series/vol1/002.jpg",
                "Series/vol1/003.jpg",
                "Series/vol2.mokuro",
                "Series/vol2/001.png",
                "Series/vol2/nested/deep.webp",
            ]
        );
        let page = files.iter().find(|f| f.relative_path() == Some("Series/vol1/002.jpg")).unwrap();
        assert_eq!(page.name(), "002.jpg");
        assert_eq!(page.data(), b"002.jpg");
    }

    #[tokio::test]
    async fn test_open_file() {
        let root = tree();
        let entry = LocalEntry::open(root.path().join("Series/vol1.mokuro")).await.unwrap();
        assert_eq!(entry.kind(), EntryKind::File);
        assert_eq!(entry.name(), "vol1.mokuro");
        assert!(entry.reader().is_err());
        let file = entry.file().await.unwrap();
        assert_eq!(file.data(), b"{}");
        assert_eq!(file.relative_path(), None);
    }

    #[tokio::test]
    async fn test_open_missing() {
        let root = TempDir::new().unwrap();
        let err = LocalEntry::open(root.path().join("nope")).await.unwrap_err();
        assert!(matches!(*err, ErrorKind::Resolve(_)));
    }
}
