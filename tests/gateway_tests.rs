//! Gateway router tests
//!
//! Exercise the full router through `tower::ServiceExt::oneshot`, covering
//! the status endpoint, the invalid-input paths of every pipeline, and the
//! registry endpoint's ordering and bounding. Upstream success paths are
//! covered at component level; these tests never require a live upstream.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use docgate::handlers::{api_router, AppState};
use docgate::registry::MetadataRecord;
use docgate::resolver::resolve_doc_id;
use docgate::upstream::UpstreamClient;

// ============================================================================
// Test Utilities
// ============================================================================

/// Build state against an unreachable upstream; tests that hit the 400 path
/// never get that far.
fn test_state() -> Arc<AppState> {
    let upstream = UpstreamClient::new("http://127.0.0.1:1").expect("client builds");
    Arc::new(AppState::new(upstream))
}

async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, Value) {
    let app = api_router(state);
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn record_for(id: &str, title: &str) -> MetadataRecord {
    let doc = resolve_doc_id(&format!("https://docs.google.com/document/d/{id}/edit"))
        .expect("test id resolves");
    MetadataRecord::new(&doc, title)
}

// ============================================================================
// Status Endpoint
// ============================================================================

#[tokio::test]
async fn test_status_never_fails() {
    let (status, body) = get(test_state(), "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "docgate");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert!(body["registry"]["capacity"].as_u64().unwrap() >= 1);
}

// ============================================================================
// Invalid Input Paths
// ============================================================================

#[tokio::test]
async fn test_meta_rejects_unresolvable_url() {
    let state = test_state();
    let (status, body) = get(
        Arc::clone(&state),
        "/api/meta?url=https://example.com/not-a-doc",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_doc_url");
    assert_eq!(body["error"]["message"], "Invalid Google Doc URL");

    // An invalid request mutates nothing.
    assert!(state.registry.is_empty().await);
}

#[tokio::test]
async fn test_meta_rejects_missing_url_param() {
    let (status, body) = get(test_state(), "/api/meta").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_doc_url");
}

#[tokio::test]
async fn test_proxy_rejects_unresolvable_url() {
    let (status, body) = get(test_state(), "/api/proxy?url=nope&mode=preview").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_doc_url");
}

#[tokio::test]
async fn test_download_rejects_unresolvable_url() {
    let (status, body) = get(test_state(), "/api/download?url=nope&format=pdf").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_doc_url");
}

#[tokio::test]
async fn test_export_alias_routes_like_download() {
    let (status, _) = get(test_state(), "/api/export?url=nope").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Upstream Failure Paths
// ============================================================================

#[tokio::test]
async fn test_meta_upstream_failure_is_bad_gateway() {
    // Valid id, unreachable upstream: connection refused on 127.0.0.1:1.
    let (status, body) = get(
        test_state(),
        "/api/meta?url=https://docs.google.com/document/d/ABC123/edit",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let error_type = body["error"]["type"].as_str().unwrap();
    assert!(error_type == "upstream_unavailable" || error_type == "upstream_timeout");
    // No upstream detail leaks into the body.
    assert!(!body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("127.0.0.1"));
}

#[tokio::test]
async fn test_download_upstream_failure_is_server_error() {
    let (status, body) = get(
        test_state(),
        "/api/download?url=https://docs.google.com/document/d/ABC123/edit&format=pdf",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["type"], "export_failed");
}

// ============================================================================
// Registry Endpoint
// ============================================================================

#[tokio::test]
async fn test_registry_empty() {
    let (status, body) = get(test_state(), "/api/registry").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["records"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_registry_returns_newest_first() {
    let state = test_state();
    state.registry.record(record_for("older", "Older Doc")).await;
    state.registry.record(record_for("newer", "Newer Doc")).await;

    let (status, body) = get(state, "/api/registry").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    let records = body["records"].as_array().unwrap();
    assert_eq!(records[0]["id"], "newer");
    assert_eq!(records[0]["title"], "Newer Doc");
    assert_eq!(records[1]["id"], "older");
}

#[tokio::test]
async fn test_registry_caps_at_ten_most_recent() {
    let state = test_state();
    for i in 0..12 {
        state
            .registry
            .record(record_for(&format!("doc{i}"), &format!("Doc {i}")))
            .await;
    }

    let (status, body) = get(state, "/api/registry").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 10);
    let records = body["records"].as_array().unwrap();
    assert_eq!(records[0]["id"], "doc11");
    assert_eq!(records[9]["id"], "doc2");
}

#[tokio::test]
async fn test_registry_honors_limit_param() {
    let state = test_state();
    for i in 0..5 {
        state
            .registry
            .record(record_for(&format!("d{i}"), "t"))
            .await;
    }

    let (_, body) = get(state, "/api/registry?limit=2").await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["records"][0]["id"], "d4");
}

#[tokio::test]
async fn test_registry_unparseable_limit_falls_back_to_default() {
    let state = test_state();
    for i in 0..3 {
        state
            .registry
            .record(record_for(&format!("d{i}"), "t"))
            .await;
    }

    // The registry endpoint never fails: a malformed limit is ignored
    // and the default applies, not a 400 from query extraction.
    let (status, body) = get(state, "/api/registry?limit=abc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["records"][0]["id"], "d2");
}

#[tokio::test]
async fn test_registry_record_has_timestamp() {
    let state = test_state();
    state.registry.record(record_for("stamped", "T")).await;

    let (_, body) = get(state, "/api/registry").await;
    let ts = body["records"][0]["timestamp"].as_str().unwrap();
    // chrono serializes DateTime<Utc> as RFC 3339.
    assert!(ts.contains('T'));
}

// ============================================================================
// Fallback
// ============================================================================

#[tokio::test]
async fn test_unknown_route_is_uniform_404() {
    let (status, body) = get(test_state(), "/api/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "not_found");
}

// ============================================================================
// Error Response Shape
// ============================================================================

#[tokio::test]
async fn test_error_responses_are_json() {
    let app = api_router(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/meta?url=garbage")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"));
}
