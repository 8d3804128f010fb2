//! API Routes
//!
//! Configures the Axum router with all caching-service endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats, calendar_stats, create_bank_account, create_business_card,
    create_calendar_event, dashboard_summary, delete_business_card, get_balance, health_handler,
    invalidate_balances, list_bank_accounts, list_business_cards, prefetch_balances,
    update_business_card, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /business-cards` - Cached, paginated business-card list
/// - `POST /business-cards` - Create a business card
/// - `PUT /business-cards/:id` - Update a business card
/// - `DELETE /business-cards/:id` - Delete a business card
/// - `GET /bank-accounts` - Cached bank-account list
/// - `POST /bank-accounts` - Create a bank account
/// - `GET /calendar/stats` - Cached monthly calendar statistics
/// - `POST /calendar/events` - Create a calendar event
/// - `GET /dashboard/summary` - Cached cross-cutting summary
/// - `GET /balances/:chain/:address` - Cached wallet balance
/// - `POST /balances/prefetch` - Batch balance warm-up
/// - `DELETE /balances/:address` - Drop balance caches for an address
/// - `GET /cache/stats` - Cache performance counters
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route(
            "/business-cards",
            get(list_business_cards).post(create_business_card),
        )
        .route(
            "/business-cards/:id",
            put(update_business_card).delete(delete_business_card),
        )
        .route(
            "/bank-accounts",
            get(list_bank_accounts).post(create_bank_account),
        )
        .route("/calendar/stats", get(calendar_stats))
        .route("/calendar/events", post(create_calendar_event))
        .route("/dashboard/summary", get(dashboard_summary))
        .route("/balances/prefetch", post(prefetch_balances))
        .route("/balances/:chain/:address", get(get_balance))
        .route("/balances/:address", delete(invalidate_balances))
        .route("/cache/stats", get(cache_stats))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
