//! Cache Backend Trait
//!
//! The key-value seam between the caching layer and whatever store backs it.
//! Handlers receive a backend through application state, never through a
//! module-level singleton, so tests can swap in their own implementations
//! and multi-instance deployments can point at a shared store.

use std::time::Duration;

use async_trait::async_trait;

use crate::cache::CacheStats;
use crate::error::Result;

// == Cache Backend ==
/// Key-value store contract used by the read-through layer.
///
/// Values are JSON-serialized strings. Any method may fail with
/// [`crate::error::AppError::Backend`]; callers treat those failures as
/// cache misses or no-ops, never as request failures.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Looks up a key. Expired entries are treated as absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores a value under a key with the given TTL, replacing any
    /// previous entry wholesale.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()>;

    /// Removes a single key. Returns whether an entry was present.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Removes every entry whose key starts with `prefix`. Returns the
    /// number of entries removed.
    async fn delete_pattern(&self, prefix: &str) -> Result<usize>;

    /// Removes all expired entries. Returns the number removed.
    async fn purge_expired(&self) -> Result<usize>;

    /// Returns performance counters for the stats endpoint.
    async fn stats(&self) -> Result<CacheStats>;
}
