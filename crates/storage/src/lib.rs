//! Persistence port for the manga catalog.
//!
//! The catalog engine belongs to the host application; this crate only
//! defines the operations the ingestion pipeline needs ([`CatalogStore`])
//! and an in-memory implementation ([`MemoryStore`]) for tests and
//! throw-away catalogs.

pub mod error;
pub mod store;

pub use crate::store::{CatalogStore, MemoryStore};
use std::sync::Arc;

pub type StoreHandle = Arc<dyn CatalogStore + Send + Sync>;
