//! In-Memory Backend
//!
//! HashMap-backed cache store with TTL expiry and prefix invalidation,
//! wrapped behind the [`CacheBackend`] trait for use from async handlers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheBackend, CacheEntry, CacheStats, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::{AppError, Result};

// == Cache Store ==
/// Synchronous cache engine combining HashMap storage with TTL expiry.
///
/// This is the single-threaded core; [`MemoryBackend`] adds the lock and the
/// async trait surface.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty CacheStore.
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Stores a key-value pair with the given TTL.
    ///
    /// If the key already exists, the entry is replaced wholesale and the
    /// TTL restarts. Oversized keys or values are rejected.
    pub fn set(&mut self, key: String, value: String, ttl: Duration) -> Result<()> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(AppError::Backend(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        if value.len() > MAX_VALUE_SIZE {
            return Err(AppError::Backend(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        self.entries.insert(key, CacheEntry::new(value, ttl));
        self.stats.set_total_entries(self.entries.len());
        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns `None` for absent keys. Expired entries are removed on the
    /// way out and count as misses.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let live = match self.entries.get(key) {
            Some(entry) if entry.is_expired() => None,
            Some(entry) => Some(entry.value.clone()),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        match live {
            Some(value) => {
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.entries.remove(key);
                self.stats.record_expirations(1);
                self.stats.set_total_entries(self.entries.len());
                self.stats.record_miss();
                None
            }
        }
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether one was present.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.stats.record_invalidations(1);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Delete Pattern ==
    /// Removes every entry whose key starts with `prefix`.
    ///
    /// This is the coarse invalidation primitive: a mutation to a resource
    /// drops the whole key namespace rather than tracking dependencies.
    pub fn delete_pattern(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - self.entries.len();

        if removed > 0 {
            self.stats.record_invalidations(removed as u64);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Purge Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub fn purge_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        let removed = before - self.entries.len();

        if removed > 0 {
            self.stats.record_expirations(removed as u64);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Memory Backend ==
/// Thread-safe in-process [`CacheBackend`] over [`CacheStore`].
#[derive(Debug, Default)]
pub struct MemoryBackend {
    inner: RwLock<CacheStore>,
}

impl MemoryBackend {
    /// Creates an empty backend behind an `Arc`, ready to share with
    /// handlers and the expiry sweeper.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        // Write lock: expired entries are removed on read.
        let mut store = self.inner.write().await;
        Ok(store.get(key))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let mut store = self.inner.write().await;
        store.set(key.to_string(), value, ttl)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut store = self.inner.write().await;
        Ok(store.delete(key))
    }

    async fn delete_pattern(&self, prefix: &str) -> Result<usize> {
        let mut store = self.inner.write().await;
        Ok(store.delete_pattern(prefix))
    }

    async fn purge_expired(&self) -> Result<usize> {
        let mut store = self.inner.write().await;
        Ok(store.purge_expired())
    }

    async fn stats(&self) -> Result<CacheStats> {
        let store = self.inner.read().await;
        Ok(store.stats())
    }
}
