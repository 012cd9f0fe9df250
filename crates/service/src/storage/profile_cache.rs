use std::{sync::Arc, time::Duration};

use configs::StorageConfig;
use models::{Document, ProfileKey};
use moka::sync::Cache;

/// Bounded, access-expiring cache of parsed profile documents.
///
/// Entries expire after sitting unread for the time-to-idle; each hit resets
/// the clock. A capacity of zero turns the cache off entirely.
#[derive(Clone)]
pub struct ProfileCache {
    inner: Option<Cache<ProfileKey, Arc<Document>>>,
}

impl ProfileCache {
    pub fn new(max_entries: u64, time_to_idle: Duration) -> Self {
        if max_entries == 0 {
            return Self::disabled();
        }
        let inner = Cache::builder()
            .name("profile-documents")
            .max_capacity(max_entries)
            .time_to_idle(time_to_idle)
            .build();
        Self { inner: Some(inner) }
    }

    pub fn from_config(cfg: &StorageConfig) -> Self {
        Self::new(cfg.cache_max_entries, cfg.cache_time_to_idle())
    }

    pub fn disabled() -> Self {
        Self { inner: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    pub fn get(&self, key: &ProfileKey) -> Option<Arc<Document>> {
        self.inner.as_ref()?.get(key)
    }

    pub fn put(&self, key: ProfileKey, doc: Arc<Document>) {
        if let Some(cache) = &self.inner {
            cache.insert(key, doc);
        }
    }

    pub fn invalidate(&self, key: &ProfileKey) {
        if let Some(cache) = &self.inner {
            cache.invalidate(key);
        }
    }

    /// Number of live entries after flushing pending evictions.
    pub fn entry_count(&self) -> u64 {
        match &self.inner {
            Some(cache) => {
                cache.run_pending_tasks();
                cache.entry_count()
            }
            None => 0,
        }
    }
}
