//! Read-Through Cache Accessor
//!
//! Wraps a [`CacheBackend`] with the lookup-or-fetch contract used by the
//! list and statistics endpoints: on a hit the cached payload is returned
//! as-is, on a miss (or any backend failure) the caller's fetch closure
//! runs against the source of truth and the result is written back.
//!
//! Caching here is an optimization, never a dependency. Backend errors on
//! `get` degrade to the direct path and errors on `set` are logged and
//! swallowed; only fetch-closure errors propagate to the caller.
//!
//! Concurrent misses for the same key are not deduplicated: both requests
//! fetch and both write, the second write replacing the first with an
//! identical payload.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{CacheBackend, CacheKey};
use crate::error::Result;

// == Cached Value ==
/// A value produced by the read-through path, tagged with whether it came
/// from the cache. Surfaced to clients as the `_cached` response field.
#[derive(Debug, Clone)]
pub struct Cached<T> {
    pub value: T,
    pub hit: bool,
}

// == Read-Through Cache ==
/// Cache accessor handed to handlers through application state.
#[derive(Clone)]
pub struct ReadThroughCache {
    backend: Arc<dyn CacheBackend>,
}

impl ReadThroughCache {
    /// Creates an accessor over the given backend.
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    /// Returns the underlying backend, for the stats endpoint and the
    /// expiry sweeper.
    pub fn backend(&self) -> Arc<dyn CacheBackend> {
        Arc::clone(&self.backend)
    }

    // == Get Or Fetch ==
    /// Looks up `key`; on a miss runs `fetch` against the source of truth
    /// and populates the cache with the result.
    ///
    /// A cached payload that fails to deserialize (a deploy changed the
    /// shape) is treated as a miss and replaced.
    pub async fn get_or_fetch<T, F, Fut>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        fetch: F,
    ) -> Result<Cached<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let rendered = key.render();

        match self.backend.get(&rendered).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    debug!(key = %rendered, "cache hit");
                    return Ok(Cached { value, hit: true });
                }
                Err(err) => {
                    warn!(key = %rendered, %err, "cached payload failed to deserialize, refetching");
                }
            },
            Ok(None) => {
                debug!(key = %rendered, "cache miss");
            }
            Err(err) => {
                warn!(key = %rendered, %err, "cache backend get failed, falling back to source");
            }
        }

        let value = fetch().await?;

        // Fire-and-forget population: a failed write costs latency on the
        // next request, nothing more.
        match serde_json::to_string(&value) {
            Ok(raw) => {
                if let Err(err) = self.backend.set(&rendered, raw, ttl).await {
                    warn!(key = %rendered, %err, "cache population failed");
                }
            }
            Err(err) => {
                warn!(key = %rendered, %err, "payload not serializable, skipping cache population");
            }
        }

        Ok(Cached { value, hit: false })
    }
}
