//! Cache Module
//!
//! Read-through caching layer: canonical key building, TTL entries, the
//! backend seam, the in-memory backend, and mutation-driven invalidation.

mod backend;
mod entry;
mod invalidation;
mod key;
mod read_through;
mod stats;
mod store;


// Re-export public types
pub use backend::CacheBackend;
pub use entry::CacheEntry;
pub use invalidation::{InvalidationDispatcher, Mutation};
pub use key::CacheKey;
pub use read_through::{Cached, ReadThroughCache};
pub use stats::CacheStats;
pub use store::{CacheStore, MemoryBackend};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 512;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
