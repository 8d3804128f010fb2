//! API Handlers
//!
//! HTTP request handlers for the cached list/statistics endpoints, the
//! mutation endpoints that trigger invalidation, and the operational
//! endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::conditional::{conditional_response, if_none_match, CachePolicy};
use crate::balances::{default_providers, BalanceLookup, BalanceService};
use crate::cache::{
    CacheBackend, CacheKey, InvalidationDispatcher, MemoryBackend, Mutation, ReadThroughCache,
};
use crate::config::{Config, TtlPolicy};
use crate::datastore::{BankAccount, BusinessCard, DataStore};
use crate::error::{AppError, Result};
use crate::models::{
    BalanceQuery, CalendarStatsQuery, CalendarStatsResponse, CollectionResponse, CompanyQuery,
    CreateAccountRequest, CreateCardRequest, CreateEventRequest, DashboardSummaryResponse,
    HealthResponse, InvalidationResponse, ListQuery, ListResponse, MutationResponse,
    PrefetchRequest, PrefetchResponse, StatsResponse, UpdateCardRequest,
};

// == App State ==
/// Application state shared across all handlers.
///
/// The cache backend is injected here rather than reached through a
/// global, so tests can isolate their own instances and a deployment can
/// point several processes at one shared store.
#[derive(Clone)]
pub struct AppState {
    pub cache: ReadThroughCache,
    pub data: Arc<DataStore>,
    pub invalidations: InvalidationDispatcher,
    pub balances: BalanceService,
    pub ttl: TtlPolicy,
}

impl AppState {
    /// Creates state over an explicit backend and data store.
    pub fn new(backend: Arc<dyn CacheBackend>, data: Arc<DataStore>, ttl: TtlPolicy) -> Self {
        let cache = ReadThroughCache::new(Arc::clone(&backend));
        let balances = BalanceService::new(
            default_providers(),
            cache.clone(),
            ttl.balance_current,
            ttl.balance_historical,
        );
        Self {
            cache,
            data,
            invalidations: InvalidationDispatcher::new(backend),
            balances,
            ttl,
        }
    }

    /// Creates state from configuration with an in-memory backend and an
    /// empty data store.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            MemoryBackend::shared(),
            Arc::new(DataStore::new()),
            TtlPolicy::from(config),
        )
    }
}

/// Cached payload for paginated lists: the page plus the total count.
#[derive(Debug, Serialize, Deserialize)]
struct PagePayload<T> {
    items: Vec<T>,
    total: usize,
}

fn to_body<T: Serialize>(payload: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(payload).map_err(|err| AppError::Internal(err.to_string()))
}

// == Business Cards ==

/// Handler for GET /business-cards
///
/// Cached list with page/limit pagination and optional company scoping.
/// Serves `304` when the client's ETag still matches.
pub async fn list_business_cards(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    headers: HeaderMap,
) -> Result<Response> {
    if let Some(error_msg) = query.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let key = CacheKey::new("business-cards:list")
        .param("page", query.page)
        .param("limit", query.limit)
        .opt_param("companyId", query.company_id);

    let data = Arc::clone(&state.data);
    let (page, limit, company_id) = (query.page, query.limit, query.company_id);
    let cached = state
        .cache
        .get_or_fetch(&key, state.ttl.business_cards, || async move {
            let (items, total) = data.list_cards(company_id, page, limit).await;
            Ok(PagePayload::<BusinessCard> { items, total })
        })
        .await?;

    let body = to_body(&ListResponse::new(
        cached.value.items,
        cached.value.total,
        query.page,
        query.limit,
        cached.hit,
    ))?;
    Ok(conditional_response(
        body,
        if_none_match(&headers),
        &CachePolicy::for_outcome(cached.hit),
    ))
}

/// Handler for POST /business-cards
pub async fn create_business_card(
    State(state): State<AppState>,
    Json(req): Json<CreateCardRequest>,
) -> Result<Json<MutationResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let card = state
        .data
        .insert_card(req.company_id, req.name, req.email, req.phone)
        .await;
    let invalidated = state.invalidations.dispatch(Mutation::BusinessCardWrite).await;

    Ok(Json(MutationResponse::new(
        format!("Business card {} created", card.id),
        card.id,
        invalidated,
    )))
}

/// Handler for PUT /business-cards/:id
pub async fn update_business_card(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateCardRequest>,
) -> Result<Json<MutationResponse>> {
    let card = state
        .data
        .update_card(id, req.name, req.email, req.phone)
        .await?;
    let invalidated = state.invalidations.dispatch(Mutation::BusinessCardWrite).await;

    Ok(Json(MutationResponse::new(
        format!("Business card {} updated", card.id),
        card.id,
        invalidated,
    )))
}

/// Handler for DELETE /business-cards/:id
pub async fn delete_business_card(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<MutationResponse>> {
    state.data.delete_card(id).await?;
    let invalidated = state.invalidations.dispatch(Mutation::BusinessCardWrite).await;

    Ok(Json(MutationResponse::new(
        format!("Business card {} deleted", id),
        id,
        invalidated,
    )))
}

// == Bank Accounts ==

/// Handler for GET /bank-accounts
pub async fn list_bank_accounts(
    State(state): State<AppState>,
    Query(query): Query<CompanyQuery>,
    headers: HeaderMap,
) -> Result<Response> {
    let key = CacheKey::new("bank-accounts:list").opt_param("companyId", query.company_id);

    let data = Arc::clone(&state.data);
    let company_id = query.company_id;
    let cached = state
        .cache
        .get_or_fetch(&key, state.ttl.bank_accounts, || async move {
            Ok::<Vec<BankAccount>, AppError>(data.list_accounts(company_id).await)
        })
        .await?;

    let body = to_body(&CollectionResponse::new(cached.value, cached.hit))?;
    Ok(conditional_response(
        body,
        if_none_match(&headers),
        &CachePolicy::for_outcome(cached.hit),
    ))
}

/// Handler for POST /bank-accounts
pub async fn create_bank_account(
    State(state): State<AppState>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<Json<MutationResponse>> {
    let account = state
        .data
        .insert_account(req.company_id, req.name, req.iban)
        .await;
    let invalidated = state.invalidations.dispatch(Mutation::BankAccountWrite).await;

    Ok(Json(MutationResponse::new(
        format!("Bank account {} created", account.id),
        account.id,
        invalidated,
    )))
}

// == Calendar ==

/// Handler for GET /calendar/stats
pub async fn calendar_stats(
    State(state): State<AppState>,
    Query(query): Query<CalendarStatsQuery>,
    headers: HeaderMap,
) -> Result<Response> {
    let key = CacheKey::new("calendar:stats")
        .param("companyId", query.company_id)
        .param("month", query.month.as_str());

    let data = Arc::clone(&state.data);
    let (company_id, month) = (query.company_id, query.month.clone());
    let cached = state
        .cache
        .get_or_fetch(&key, state.ttl.calendar, || async move {
            data.calendar_stats(company_id, &month).await
        })
        .await?;

    let body = to_body(&CalendarStatsResponse {
        stats: cached.value,
        cached: cached.hit,
    })?;
    Ok(conditional_response(
        body,
        if_none_match(&headers),
        &CachePolicy::for_outcome(cached.hit),
    ))
}

/// Handler for POST /calendar/events
///
/// Calendar writes also invalidate the dashboard summary, which counts
/// upcoming events.
pub async fn create_calendar_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<Json<MutationResponse>> {
    let event = state
        .data
        .insert_event(req.company_id, req.title, req.starts_at)
        .await;
    let invalidated = state.invalidations.dispatch(Mutation::CalendarEventWrite).await;

    Ok(Json(MutationResponse::new(
        format!("Calendar event {} created", event.id),
        event.id,
        invalidated,
    )))
}

// == Dashboard ==

/// Handler for GET /dashboard/summary
pub async fn dashboard_summary(
    State(state): State<AppState>,
    Query(query): Query<CompanyQuery>,
    headers: HeaderMap,
) -> Result<Response> {
    let key = CacheKey::new("dashboard:summary").opt_param("companyId", query.company_id);

    let data = Arc::clone(&state.data);
    let company_id = query.company_id;
    let cached = state
        .cache
        .get_or_fetch(&key, state.ttl.dashboard, || async move {
            Ok(data.dashboard_summary(company_id).await)
        })
        .await?;

    let body = to_body(&DashboardSummaryResponse {
        summary: cached.value,
        cached: cached.hit,
    })?;
    Ok(conditional_response(
        body,
        if_none_match(&headers),
        &CachePolicy::for_outcome(cached.hit),
    ))
}

// == Balances ==

/// Handler for GET /balances/:chain/:address
///
/// Always responds `200`; unsupported chains and provider failures come
/// back as a zero amount with `failed: true`.
pub async fn get_balance(
    State(state): State<AppState>,
    Path((chain, address)): Path<(String, String)>,
    Query(query): Query<BalanceQuery>,
) -> Json<crate::balances::BalanceResult> {
    let lookup = BalanceLookup {
        address,
        chain,
        currency: query.currency,
        at: query.at,
    };
    Json(state.balances.balance(&lookup).await)
}

/// Handler for DELETE /balances/:address
///
/// Explicit invalidation hook fired when a wallet is added, removed, or
/// re-labelled: drops the current and historical balance entries for the
/// address regardless of remaining TTL.
pub async fn invalidate_balances(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Json<InvalidationResponse> {
    let invalidated = state
        .invalidations
        .dispatch(Mutation::WalletWrite {
            address: address.clone(),
        })
        .await;

    Json(InvalidationResponse::new(
        format!("Balance caches for {} invalidated", address),
        invalidated,
    ))
}

/// Handler for POST /balances/prefetch
pub async fn prefetch_balances(
    State(state): State<AppState>,
    Json(req): Json<PrefetchRequest>,
) -> Json<PrefetchResponse> {
    let results = state.balances.prefetch(&req.lookups).await;
    Json(PrefetchResponse { results })
}

// == Operational ==

/// Handler for GET /cache/stats
///
/// A dead backend yields zeroed stats rather than an error; the endpoint
/// is for observation, not correctness.
pub async fn cache_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = match state.cache.backend().stats().await {
        Ok(stats) => stats,
        Err(err) => {
            warn!(%err, "cache backend stats unavailable");
            Default::default()
        }
    };

    Json(StatsResponse::new(
        stats.hits,
        stats.misses,
        stats.invalidations,
        stats.expirations,
        stats.total_entries,
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
