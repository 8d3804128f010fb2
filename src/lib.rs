//! Backoffice Cache - read-through caching service
//!
//! Serves the list/statistics endpoints of a multi-tenant back-office API
//! through a TTL cache with canonical key derivation, mutation-driven
//! invalidation, and ETag conditional responses.

pub mod api;
pub mod balances;
pub mod cache;
pub mod config;
pub mod datastore;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
