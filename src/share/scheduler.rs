use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::{AbortHandle, JoinHandle};

use crate::share::store::ObjectStore;

struct Pending {
    generation: u64,
    handle: AbortHandle,
}

#[derive(Default)]
struct Inner {
    next_generation: u64,
    pending: HashMap<String, Pending>,
}

/// Delayed deletion of shared objects, one timer per key.
///
/// Scheduling a key that already has a timer cancels the old one, so a re-share restarts the
/// retention window instead of racing the earlier deletion.
#[derive(Clone)]
pub struct DeletionScheduler {
    store: Arc<dyn ObjectStore>,
    inner: Arc<Mutex<Inner>>,
}

impl DeletionScheduler {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Delete `key` after `delay`. Must be called inside a tokio runtime.
    pub fn schedule(&self, key: &str, delay: Duration) -> JoinHandle<()> {
        let mut inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        inner.next_generation += 1;
        let generation = inner.next_generation;

        let store = Arc::clone(&self.store);
        let shared = Arc::clone(&self.inner);
        let task_key = key.to_string();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut inner = shared.lock().unwrap_or_else(|p| p.into_inner());
                match inner.pending.get(&task_key) {
                    Some(p) if p.generation == generation => {
                        inner.pending.remove(&task_key);
                    }
                    _ => return,
                }
            }
            match store.delete(&task_key).await {
                Ok(()) => tracing::info!(key = %task_key, "expired share deleted"),
                Err(err) => tracing::warn!(key = %task_key, error = %err, "share deletion failed"),
            }
        });

        let previous = inner.pending.insert(
            key.to_string(),
            Pending {
                generation,
                handle: task.abort_handle(),
            },
        );
        if let Some(prev) = previous {
            prev.handle.abort();
            tracing::debug!(key, "rescheduled share deletion");
        }
        task
    }

    /// Cancel a pending deletion. Returns `true` when one was pending.
    pub fn cancel(&self, key: &str) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        match inner.pending.remove(key) {
            Some(p) => {
                p.handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_scheduled(&self, key: &str) -> bool {
        let inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        inner.pending.contains_key(key)
    }

    pub fn pending(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        inner.pending.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/share/scheduler.rs"]
mod tests;
