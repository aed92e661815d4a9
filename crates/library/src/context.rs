use crate::host::{NotifierHandle, QuotaHandle, TracingNotifier, Unmanaged};
use mokuro_model::Classifier;
use mokuro_storage::StoreHandle;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};

type TitleLocks = Arc<std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>>;

/// Default number of entries requested per directory batch.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Tunables for one ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub classifier: Classifier,
    /// Maximum entries per directory read when walking local paths.
    pub batch_size: usize,
    /// Ask the host for persistent storage before writing to the catalog.
    pub request_persistent: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            classifier: Classifier::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            request_persistent: true,
        }
    }
}

/// Everything the pipeline needs from its host, passed explicitly to every
/// stage.
///
/// Cloning is cheap and clones share the same per-title locks, so concurrent
/// ingests through clones of one context never interleave writes to the
/// same title.
#[derive(Clone)]
pub struct Context {
    store: StoreHandle,
    notifier: NotifierHandle,
    quota: QuotaHandle,
    settings: Arc<Settings>,
    title_locks: TitleLocks,
}

impl Context {
    /// A context writing to `store`, logging notifications, without a
    /// storage quota, and with default settings.
    pub fn new(store: StoreHandle) -> Self {
        Self {
            store,
            notifier: Arc::new(TracingNotifier),
            quota: Arc::new(Unmanaged),
            settings: Arc::new(Settings::default()),
            title_locks: Arc::default(),
        }
    }

    pub fn with_notifier(mut self, notifier: NotifierHandle) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_quota(mut self, quota: QuotaHandle) -> Self {
        self.quota = quota;
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Arc::new(settings);
        self
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    pub fn notifier(&self) -> &NotifierHandle {
        &self.notifier
    }

    pub fn quota(&self) -> &QuotaHandle {
        &self.quota
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn classifier(&self) -> &Classifier {
        &self.settings.classifier
    }

    /// Exclusive access to one title for the lifetime of the guard.
    ///
    /// A title's lock is dropped from the table once the last guard or
    /// waiter for it is gone.
    pub(crate) async fn lock_title(&self, title_id: &str) -> TitleGuard {
        let lock = {
            let mut locks = self.title_locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(title_id.to_string()).or_default())
        };
        TitleGuard {
            title_id: title_id.to_string(),
            guard: Some(lock.lock_owned().await),
            locks: Arc::clone(&self.title_locks),
        }
    }

    #[cfg(test)]
    pub(crate) fn tracked_titles(&self) -> usize {
        self.title_locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Held while a title is being merged.
pub(crate) struct TitleGuard {
    title_id: String,
    guard: Option<OwnedMutexGuard<()>>,
    locks: TitleLocks,
}

impl Drop for TitleGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Waiters hold their own clone, so a count of one means nobody else wants it.
        if locks.get(&self.title_id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(&self.title_id);
        }
    }
}
