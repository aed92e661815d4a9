//! In-memory catalog store.

use crate::CatalogStore;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::OptionExt;
use mokuro_model::{CatalogEntry, Volume};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Catalog held in a `BTreeMap` behind a [`RwLock`], so every trait method
/// works on `&self`.
///
/// Used by tests and by the command line, which ingests into a fresh catalog
/// and prints it.
///
/// # Examples
///
/// ```
/// use mokuro_storage::{CatalogStore, MemoryStore};
/// use mokuro_model::CatalogEntry;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::default();
/// store.add(CatalogEntry::new("title-1", vec![])).await?;
/// assert!(store.exists("title-1").await?);
/// assert!(store.add(CatalogEntry::new("title-1", vec![])).await.is_err());
/// # Ok(())
/// # }
/// ```
pub struct MemoryStore {
    name: String,
    entries: RwLock<BTreeMap<String, CatalogEntry>>,
}

impl MemoryStore {
    /// Create a store pre-populated with entries. A later entry with the same
    /// id replaces an earlier one.
    pub fn with_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        Self {
            name: "memory".to_string(),
            entries: RwLock::new(entries.into_iter().map(|entry| (entry.id.clone(), entry)).collect()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Copy of every entry, ordered by title id.
    pub async fn snapshot(&self) -> Vec<CatalogEntry> {
        self.entries.read().await.values().cloned().collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_entries([])
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, title_id: &str) -> Result<Option<CatalogEntry>> {
        Ok(self.entries.read().await.get(title_id).cloned())
    }

    async fn add(&self, entry: CatalogEntry) -> Result<()> {
        let mut guard = self.entries.write().await;
        if guard.contains_key(&entry.id) {
            exn::bail!(ErrorKind::AlreadyExists(entry.id));
        }
        tracing::trace!(store = %self.name, title = %entry.id, volumes = entry.volumes.len(), "Adding catalog entry");
        guard.insert(entry.id.clone(), entry);
        Ok(())
    }

    async fn update(&self, title_id: &str, volumes: Vec<Volume>) -> Result<()> {
        let mut guard = self.entries.write().await;
        let entry = guard.get_mut(title_id).ok_or_raise(|| ErrorKind::NotFound(title_id.to_string()))?;
        tracing::trace!(store = %self.name, title = %title_id, volumes = volumes.len(), "Updating catalog entry");
        entry.volumes = volumes;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }
}
