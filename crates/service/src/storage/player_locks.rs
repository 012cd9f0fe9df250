use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use uuid::Uuid;

/// Advisory per-player locks serializing access to one player's directory.
///
/// Guards the read-modify-write of the locations document, the shared temp
/// file names used by atomic replace, and profile cache fills. An entry only
/// lives while some caller holds or waits on it.
#[derive(Default)]
pub struct PlayerLocks {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl PlayerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `uuid`.
    pub fn with_lock<R>(&self, uuid: Uuid, f: impl FnOnce() -> R) -> R {
        // Clone the Arc out so the shard guard is released before blocking.
        let lock = self.locks.entry(uuid).or_default().clone();
        let out = {
            let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            f()
        };
        drop(lock);
        // Clones are taken under the shard lock, so a count of one means the
        // map holds the only reference and nobody is waiting.
        self.locks.remove_if(&uuid, |_, lock| Arc::strong_count(lock) == 1);
        out
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
