//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle: read-through caching on list
//! endpoints, invalidation on mutation, ETag conditional handling, and
//! balance failure semantics.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use backoffice_cache::api::create_router;
use backoffice_cache::cache::MemoryBackend;
use backoffice_cache::config::{Config, TtlPolicy};
use backoffice_cache::datastore::DataStore;
use backoffice_cache::AppState;
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn test_state() -> AppState {
    AppState::new(
        MemoryBackend::shared(),
        Arc::new(DataStore::new()),
        TtlPolicy::from(&Config::default()),
    )
}

fn create_test_app() -> (Router, AppState) {
    let state = test_state();
    (create_router(state.clone()), state)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// == Read-Through Caching ==

#[tokio::test]
async fn test_list_miss_then_hit_then_invalidation() {
    let (app, state) = create_test_app();

    let created = app
        .clone()
        .oneshot(post_json(
            "/business-cards",
            r#"{"companyId":1,"name":"ACME GmbH","email":"office@acme.example"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::OK);
    let card_id = body_to_json(created.into_body()).await["id"].as_u64().unwrap();

    let queries_before = state.data.query_count();

    // First read: cache miss, source queried once.
    let first = app
        .clone()
        .oneshot(get("/business-cards?page=1&limit=20"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first_json = body_to_json(first.into_body()).await;
    assert_eq!(first_json["_cached"], false);
    assert_eq!(first_json["total"], 1);
    assert_eq!(state.data.query_count(), queries_before + 1);

    // Second identical read: cache hit, source untouched, same page.
    let second = app
        .clone()
        .oneshot(get("/business-cards?page=1&limit=20"))
        .await
        .unwrap();
    let second_json = body_to_json(second.into_body()).await;
    assert_eq!(second_json["_cached"], true);
    assert_eq!(second_json["items"], first_json["items"]);
    assert_eq!(state.data.query_count(), queries_before + 1);

    // Mutation invalidates the namespace.
    let updated = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/business-cards/{}", card_id))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"name":"ACME AG"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(updated.status(), StatusCode::OK);

    // Third read: miss again, fresh data.
    let third = app
        .clone()
        .oneshot(get("/business-cards?page=1&limit=20"))
        .await
        .unwrap();
    let third_json = body_to_json(third.into_body()).await;
    assert_eq!(third_json["_cached"], false);
    assert_eq!(third_json["items"][0]["name"], "ACME AG");
    assert_eq!(state.data.query_count(), queries_before + 2);
}

#[tokio::test]
async fn test_different_filters_are_distinct_cache_lines() {
    let (app, _state) = create_test_app();

    let first = app
        .clone()
        .oneshot(get("/business-cards?page=1&limit=20&companyId=1"))
        .await
        .unwrap();
    assert_eq!(body_to_json(first.into_body()).await["_cached"], false);

    // Same namespace, different company: its own entry.
    let other = app
        .clone()
        .oneshot(get("/business-cards?page=1&limit=20&companyId=2"))
        .await
        .unwrap();
    assert_eq!(body_to_json(other.into_body()).await["_cached"], false);

    // Repeat of the first is a hit.
    let repeat = app
        .clone()
        .oneshot(get("/business-cards?page=1&limit=20&companyId=1"))
        .await
        .unwrap();
    assert_eq!(body_to_json(repeat.into_body()).await["_cached"], true);
}

// == ETag / Conditional Responses ==

#[tokio::test]
async fn test_etag_conditional_roundtrip() {
    let (app, _state) = create_test_app();

    let first = app
        .clone()
        .oneshot(get("/bank-accounts?companyId=1"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let etag = first
        .headers()
        .get(header::ETAG)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();

    // Conditional re-request with a matching ETag short-circuits.
    let not_modified = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/bank-accounts?companyId=1")
                .header(header::IF_NONE_MATCH, &etag)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(not_modified.status(), StatusCode::NOT_MODIFIED);
    let bytes = axum::body::to_bytes(not_modified.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.is_empty(), "304 must carry an empty body");

    // A stale ETag gets the full payload again.
    let full = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/bank-accounts?companyId=1")
                .header(header::IF_NONE_MATCH, "\"stale\"")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(full.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cache_control_differs_by_path() {
    let (app, _state) = create_test_app();

    let miss = app
        .clone()
        .oneshot(get("/business-cards?page=1&limit=20"))
        .await
        .unwrap();
    let miss_cc = miss
        .headers()
        .get(header::CACHE_CONTROL)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(miss_cc.contains("max-age=60"));
    assert!(miss_cc.contains("s-maxage=300"));
    assert!(miss_cc.contains("stale-while-revalidate"));

    let hit = app
        .clone()
        .oneshot(get("/business-cards?page=1&limit=20"))
        .await
        .unwrap();
    let hit_cc = hit
        .headers()
        .get(header::CACHE_CONTROL)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(hit_cc.contains("max-age=300"));
    assert!(hit_cc.contains("s-maxage=900"));
}

// == Cross-Cutting Invalidation ==

#[tokio::test]
async fn test_calendar_write_invalidates_dashboard_summary() {
    let (app, _state) = create_test_app();

    // Warm both the calendar stats and the dashboard summary.
    let stats = app
        .clone()
        .oneshot(get("/calendar/stats?companyId=1&month=2026-08"))
        .await
        .unwrap();
    assert_eq!(stats.status(), StatusCode::OK);

    let summary = app
        .clone()
        .oneshot(get("/dashboard/summary?companyId=1"))
        .await
        .unwrap();
    assert_eq!(body_to_json(summary.into_body()).await["_cached"], false);

    let warm_summary = app
        .clone()
        .oneshot(get("/dashboard/summary?companyId=1"))
        .await
        .unwrap();
    assert_eq!(body_to_json(warm_summary.into_body()).await["_cached"], true);

    // Creating an event drops both caches.
    let created = app
        .clone()
        .oneshot(post_json(
            "/calendar/events",
            r#"{"companyId":1,"title":"Board meeting","startsAt":"2031-08-20T09:00:00Z"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::OK);
    let created_json = body_to_json(created.into_body()).await;
    assert!(created_json["invalidated"].as_u64().unwrap() >= 2);

    let cold_summary = app
        .clone()
        .oneshot(get("/dashboard/summary?companyId=1"))
        .await
        .unwrap();
    let cold_json = body_to_json(cold_summary.into_body()).await;
    assert_eq!(cold_json["_cached"], false);
    assert_eq!(cold_json["upcoming_event_count"], 1);
}

#[tokio::test]
async fn test_calendar_stats_reflect_new_events() {
    let (app, _state) = create_test_app();

    app.clone()
        .oneshot(post_json(
            "/calendar/events",
            r#"{"companyId":1,"title":"Kickoff","startsAt":"2026-08-03T10:00:00Z"}"#,
        ))
        .await
        .unwrap();

    let stats = app
        .clone()
        .oneshot(get("/calendar/stats?companyId=1&month=2026-08"))
        .await
        .unwrap();
    let stats_json = body_to_json(stats.into_body()).await;
    assert_eq!(stats_json["event_count"], 1);
    assert_eq!(stats_json["busiest_day"], 3);

    // Second event in the same month invalidates the cached aggregate.
    app.clone()
        .oneshot(post_json(
            "/calendar/events",
            r#"{"companyId":1,"title":"Review","startsAt":"2026-08-03T15:00:00Z"}"#,
        ))
        .await
        .unwrap();

    let refreshed = app
        .clone()
        .oneshot(get("/calendar/stats?companyId=1&month=2026-08"))
        .await
        .unwrap();
    let refreshed_json = body_to_json(refreshed.into_body()).await;
    assert_eq!(refreshed_json["_cached"], false);
    assert_eq!(refreshed_json["event_count"], 2);
}

// == Balances ==

#[tokio::test]
async fn test_balance_unsupported_chain_returns_zero() {
    let (app, _state) = create_test_app();

    let response = app
        .clone()
        .oneshot(get("/balances/dogecoin/DABC123?currency=EUR"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["amount"], 0.0);
    assert_eq!(json["failed"], true);
}

#[tokio::test]
async fn test_balance_cached_on_repeat() {
    let (app, _state) = create_test_app();

    let first = app
        .clone()
        .oneshot(get("/balances/ethereum/0xabc?currency=EUR"))
        .await
        .unwrap();
    let first_json = body_to_json(first.into_body()).await;
    assert_eq!(first_json["failed"], false);
    assert_eq!(first_json["_cached"], false);

    let second = app
        .clone()
        .oneshot(get("/balances/ethereum/0xabc?currency=EUR"))
        .await
        .unwrap();
    let second_json = body_to_json(second.into_body()).await;
    assert_eq!(second_json["_cached"], true);
    assert_eq!(second_json["amount"], first_json["amount"]);
}

#[tokio::test]
async fn test_prefetch_isolates_failures_and_warms_cache() {
    let (app, _state) = create_test_app();

    let prefetch = app
        .clone()
        .oneshot(post_json(
            "/balances/prefetch",
            r#"{"lookups":[
                {"address":"bc1qxyz","chain":"bitcoin","currency":"EUR"},
                {"address":"DABC","chain":"dogecoin","currency":"EUR"}
            ]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(prefetch.status(), StatusCode::OK);

    let json = body_to_json(prefetch.into_body()).await;
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["failed"], false);
    assert_eq!(results[1]["failed"], true);
    assert_eq!(results[1]["amount"], 0.0);

    // The successful lookup is now warm.
    let warmed = app
        .clone()
        .oneshot(get("/balances/bitcoin/bc1qxyz?currency=EUR"))
        .await
        .unwrap();
    assert_eq!(body_to_json(warmed.into_body()).await["_cached"], true);
}

#[tokio::test]
async fn test_wallet_invalidation_drops_balance_cache() {
    let (app, _state) = create_test_app();

    // Warm the balance cache for one address.
    app.clone()
        .oneshot(get("/balances/ethereum/0xabc?currency=EUR"))
        .await
        .unwrap();
    app.clone()
        .oneshot(get("/balances/ethereum/0xother?currency=EUR"))
        .await
        .unwrap();

    let invalidated = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/balances/0xabc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(invalidated.status(), StatusCode::OK);
    let json = body_to_json(invalidated.into_body()).await;
    assert_eq!(json["invalidated"], 1);

    // The invalidated address misses; the other stays warm.
    let cold = app
        .clone()
        .oneshot(get("/balances/ethereum/0xabc?currency=EUR"))
        .await
        .unwrap();
    assert_eq!(body_to_json(cold.into_body()).await["_cached"], false);

    let warm = app
        .clone()
        .oneshot(get("/balances/ethereum/0xother?currency=EUR"))
        .await
        .unwrap();
    assert_eq!(body_to_json(warm.into_body()).await["_cached"], true);
}

// == Operational Endpoints ==

#[tokio::test]
async fn test_cache_stats_track_traffic() {
    let (app, _state) = create_test_app();

    app.clone()
        .oneshot(get("/business-cards?page=1&limit=20"))
        .await
        .unwrap(); // miss
    app.clone()
        .oneshot(get("/business-cards?page=1&limit=20"))
        .await
        .unwrap(); // hit

    let stats = app.clone().oneshot(get("/cache/stats")).await.unwrap();
    let json = body_to_json(stats.into_body()).await;
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["hit_rate"], 0.5);
    assert_eq!(json["total_entries"], 1);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _state) = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_invalid_month_is_400() {
    let (app, _state) = create_test_app();

    let response = app
        .oneshot(get("/calendar/stats?companyId=1&month=August"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
