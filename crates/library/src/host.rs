//! Ports to the host application: user notifications and storage quota.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};

pub type NotifierHandle = Arc<dyn Notifier + Send + Sync>;
pub type QuotaHandle = Arc<dyn QuotaRequester + Send + Sync>;

/// Where user-facing pass/fail messages go (a toast, a status line, ...).
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Emits every notification as an `info` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::info!(notification = %message, "Notify");
    }
}

/// Keeps every notification in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn last(&self) -> Option<String> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        tracing::debug!(notification = %message, "Notify");
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).push(message.to_string());
    }
}

/// Asks the host to keep the catalog's storage from being evicted.
#[async_trait]
pub trait QuotaRequester: Send + Sync {
    /// Whether persistent storage is (now) granted. Best effort: a `false`
    /// never stops an ingest.
    async fn request_persistent(&self) -> bool;
}

/// A host with no storage quota to manage; never grants anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unmanaged;

#[async_trait]
impl QuotaRequester for Unmanaged {
    async fn request_persistent(&self) -> bool {
        false
    }
}
