//! Request and Response models for the caching service API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    BalanceQuery, CalendarStatsQuery, CompanyQuery, CreateAccountRequest, CreateCardRequest,
    CreateEventRequest, ListQuery, PrefetchRequest, UpdateCardRequest,
};
pub use responses::{
    CalendarStatsResponse, CollectionResponse, DashboardSummaryResponse, ErrorResponse,
    HealthResponse, InvalidationResponse, ListResponse, MutationResponse, PrefetchResponse,
    StatsResponse,
};
