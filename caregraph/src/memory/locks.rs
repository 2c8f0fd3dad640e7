use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per session id.
///
/// Waiters queue in FIFO order (tokio's mutex is fair), so turns against one session run
/// in arrival order. Different ids never contend. An id's entry lives only while a guard
/// for it is held or a waiter is queued on it.
#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `id`. Access ends when the guard is dropped.
    pub async fn acquire(&self, id: &str) -> SessionGuard<'_> {
        // Clone the Arc out so the map shard is not held across the await.
        let lock = self
            .locks
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = lock.lock_owned().await;
        SessionGuard {
            locks: self,
            id: id.to_string(),
            guard: Some(guard),
        }
    }

    /// Number of ids currently locked or waited on.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    /// Drops the entry for `id` when nobody else holds or waits on its mutex.
    fn release(&self, id: &str) {
        self.locks
            .remove_if(id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// Exclusive access to one session id, returned by [`SessionLocks::acquire`].
#[derive(Debug)]
pub struct SessionGuard<'a> {
    locks: &'a SessionLocks,
    id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl SessionGuard<'_> {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        // Unlock first so the owned guard's Arc no longer counts.
        self.guard.take();
        self.locks.release(&self.id);
    }
}
