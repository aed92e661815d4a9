//! Catalog store trait and the in-memory implementation.

mod memory;

pub use self::memory::MemoryStore;
use crate::error::Result;
use async_trait::async_trait;
use mokuro_model::{CatalogEntry, Volume};

/// The host's catalog of titles.
///
/// The pipeline only ever reads one title, creates one title, or replaces a
/// title's volume list. Transactions (if any) are the store's business; each
/// call is expected to be atomic on its own.
///
/// # Examples
///
/// ```
/// use mokuro_storage::{CatalogStore, error::Result};
///
/// async fn volume_count(store: &dyn CatalogStore, title_id: &str) -> Result<usize> {
///     Ok(store.get(title_id).await?.map_or(0, |entry| entry.volumes.len()))
/// }
/// ```
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Name of the store, for logging only.
    fn name(&self) -> &str;

    /// Fetch the entry for a title, if one exists.
    async fn get(&self, title_id: &str) -> Result<Option<CatalogEntry>>;

    /// Create a new entry.
    ///
    /// Fails with [`AlreadyExists`](crate::error::ErrorKind::AlreadyExists)
    /// if the title is already present.
    async fn add(&self, entry: CatalogEntry) -> Result<()>;

    /// Replace the volume list of an existing entry.
    ///
    /// Fails with [`NotFound`](crate::error::ErrorKind::NotFound) if the
    /// title is not present.
    async fn update(&self, title_id: &str, volumes: Vec<Volume>) -> Result<()>;

    /// Ids of every title in the catalog.
    async fn list(&self) -> Result<Vec<String>>;

    /// Whether an entry exists for the title.
    ///
    /// Default implementation fetches the whole entry with
    /// [`get()`](Self::get).
    async fn exists(&self, title_id: &str) -> Result<bool> {
        Ok(self.get(title_id).await?.is_some())
    }
}
