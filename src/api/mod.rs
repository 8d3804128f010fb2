//! API Module
//!
//! HTTP handlers, routing, and the conditional-response layer for the
//! caching service REST API.

pub mod conditional;
pub mod handlers;
pub mod routes;

pub use conditional::{conditional_response, etag_for, CachePolicy};
pub use handlers::AppState;
pub use routes::create_router;
