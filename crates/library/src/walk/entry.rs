use crate::walk::error::Result;
use async_trait::async_trait;
use mokuro_model::SourceFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

pub type EntryHandle = Box<dyn Entry>;

/// One node of a tree being walked.
#[async_trait]
pub trait Entry: Send + Sync {
    /// Base name of the entry.
    fn name(&self) -> &str;

    /// `/`-separated path from the parent of the walk root, starting with
    /// the root's own name.
    fn full_path(&self) -> &str;

    fn kind(&self) -> EntryKind;

    /// Start listing a directory's children.
    ///
    /// Fails with [`Enumerate`](crate::walk::error::ErrorKind::Enumerate) for
    /// anything that is not a directory.
    fn reader(&self) -> Result<Box<dyn EntryReader>>;

    /// Read a file's contents. The returned file carries only its base name;
    /// the walker stamps the relative path.
    async fn file(&self) -> Result<SourceFile>;
}

/// Batched listing of one directory.
#[async_trait]
pub trait EntryReader: Send {
    /// The next batch of children. An empty batch means the directory is
    /// exhausted.
    async fn read_entries(&mut self) -> Result<Vec<EntryHandle>>;
}

/// Join a child name onto a parent's full path.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() { name.to_string() } else { format!("{parent}/{name}") }
}
