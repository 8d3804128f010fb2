//! Response DTOs for the caching service API
//!
//! Defines the structure of outgoing HTTP response bodies. Cached reads
//! carry a `_cached` field so clients (and the integration tests) can tell
//! a hit from a freshly computed payload.

use serde::{Deserialize, Serialize};

use crate::datastore::{CalendarStats, DashboardSummary};

/// Response body for paginated list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    #[serde(rename = "_cached")]
    pub cached: bool,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>, total: usize, page: usize, limit: usize, cached: bool) -> Self {
        Self {
            items,
            total,
            page,
            limit,
            cached,
        }
    }
}

/// Response body for unpaginated collection endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
    #[serde(rename = "_cached")]
    pub cached: bool,
}

impl<T> CollectionResponse<T> {
    pub fn new(items: Vec<T>, cached: bool) -> Self {
        let total = items.len();
        Self {
            items,
            total,
            cached,
        }
    }
}

/// Response body for explicit invalidation hooks (DELETE /balances/:address).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvalidationResponse {
    pub message: String,
    pub invalidated: usize,
}

impl InvalidationResponse {
    pub fn new(message: impl Into<String>, invalidated: usize) -> Self {
        Self {
            message: message.into(),
            invalidated,
        }
    }
}

/// Response body for POST /balances/prefetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefetchResponse {
    pub results: Vec<crate::balances::BalanceResult>,
}

/// Response body for mutation endpoints, reporting how many cache entries
/// the write invalidated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationResponse {
    pub message: String,
    pub id: u64,
    pub invalidated: usize,
}

impl MutationResponse {
    pub fn new(message: impl Into<String>, id: u64, invalidated: usize) -> Self {
        Self {
            message: message.into(),
            id,
            invalidated,
        }
    }
}

/// Response body for GET /calendar/stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarStatsResponse {
    #[serde(flatten)]
    pub stats: CalendarStats,
    #[serde(rename = "_cached")]
    pub cached: bool,
}

/// Response body for GET /dashboard/summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummaryResponse {
    #[serde(flatten)]
    pub summary: DashboardSummary,
    #[serde(rename = "_cached")]
    pub cached: bool,
}

/// Response body for the cache stats endpoint (GET /cache/stats).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
    pub expirations: u64,
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(
        hits: u64,
        misses: u64,
        invalidations: u64,
        expirations: u64,
        total_entries: usize,
    ) -> Self {
        let total_requests = hits + misses;
        let hit_rate = if total_requests > 0 {
            hits as f64 / total_requests as f64
        } else {
            0.0
        };
        Self {
            hits,
            misses,
            invalidations,
            expirations,
            total_entries,
            hit_rate,
        }
    }
}

/// Response body for the health endpoint (GET /health).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
