//! In-memory entry tree for testing.

use crate::walk::entry::{Entry, EntryHandle, EntryKind, EntryReader, join_path};
use crate::walk::error::{ErrorKind, Result};
use async_trait::async_trait;
use mokuro_model::SourceFile;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Node {
    File(Arc<[u8]>),
    Directory(Vec<MemoryEntry>),
    /// A file whose contents can never be read.
    Failing,
}

/// An [`Entry`] tree built in memory.
///
/// Full paths are assigned as the tree is walked: a child's full path is
/// its parent's full path plus its own name. Directory reads hand out at
/// most `batch_size` children at a time, and children inherit the batch size
/// of the directory that lists them.
#[derive(Debug, Clone)]
pub struct MemoryEntry {
    name: String,
    full_path: String,
    node: Node,
    batch_size: usize,
}

impl MemoryEntry {
    fn new(name: impl Into<String>, node: Node) -> Self {
        let name = name.into();
        Self { full_path: name.clone(), name, node, batch_size: crate::DEFAULT_BATCH_SIZE }
    }

    pub fn file(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self::new(name, Node::File(data.into()))
    }

    pub fn directory(name: impl Into<String>, children: impl IntoIterator<Item = MemoryEntry>) -> Self {
        Self::new(name, Node::Directory(children.into_iter().collect()))
    }

    /// A file entry whose resolution always fails.
    pub fn failing(name: impl Into<String>) -> Self {
        Self::new(name, Node::Failing)
    }

    /// Batch size for this directory's reads (and, by inheritance, for every
    /// directory below it). Clamped to at least one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    fn child_of(&self, child: &MemoryEntry) -> MemoryEntry {
        MemoryEntry { full_path: join_path(&self.full_path, &child.name), batch_size: self.batch_size, ..child.clone() }
    }
}

#[async_trait]
impl Entry for MemoryEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn full_path(&self) -> &str {
        &self.full_path
    }

    fn kind(&self) -> EntryKind {
        match self.node {
            Node::Directory(_) => EntryKind::Directory,
            Node::File(_) | Node::Failing => EntryKind::File,
        }
    }

    fn reader(&self) -> Result<Box<dyn EntryReader>> {
        let Node::Directory(children) = &self.node else {
            exn::bail!(ErrorKind::Enumerate(self.full_path.clone()));
        };
        let children: Vec<_> = children.iter().map(|child| self.child_of(child)).collect();
        Ok(Box::new(MemoryReader { children: children.into_iter(), batch_size: self.batch_size }))
    }

    async fn file(&self) -> Result<SourceFile> {
        match &self.node {
            Node::File(data) => Ok(SourceFile::new(self.name.clone(), Arc::clone(data))),
            Node::Directory(_) | Node::Failing => exn::bail!(ErrorKind::Resolve(self.full_path.clone())),
        }
    }
}

struct MemoryReader {
    children: std::vec::IntoIter<MemoryEntry>,
    batch_size: usize,
}

#[async_trait]
impl EntryReader for MemoryReader {
    async fn read_entries(&mut self) -> Result<Vec<EntryHandle>> {
        Ok(self.children.by_ref().take(self.batch_size).map(|child| Box::new(child) as EntryHandle).collect())
    }
}
