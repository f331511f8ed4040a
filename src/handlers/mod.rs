//! HTTP handlers for the gateway API surface
//!
//! Each caller-facing operation is a short linear pipeline: resolve the
//! document identifier, make at most one upstream call, and either scrape
//! metadata or relay the byte stream. Handlers share a single [`AppState`]
//! carrying the upstream client and the activity registry; both are
//! constructed once at startup and injected here.
//!
//! # Modules
//!
//! - [`status`] - operational status descriptor
//! - [`meta`] - metadata lookup and activity registry inspection
//! - [`stream`] - render-proxy and export stream relays

use std::sync::Arc;
use std::time::Instant;

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::{DateTime, Utc};

use crate::registry::ActivityRegistry;
use crate::upstream::UpstreamClient;

pub mod meta;
pub mod status;
pub mod stream;

pub use meta::{meta_handler, registry_handler, MetaParams, RegistryParams, RegistryResponse};
pub use status::{status_handler, StatusResponse};
pub use stream::{download_handler, proxy_handler, DownloadParams, ProxyParams};

/// Shared state injected into every handler.
pub struct AppState {
    /// Client for the upstream document service.
    pub upstream: UpstreamClient,
    /// Bounded log of metadata lookups.
    pub registry: ActivityRegistry,
    started_at: Instant,
    started_at_utc: DateTime<Utc>,
}

impl AppState {
    /// Create fresh state around an upstream client.
    pub fn new(upstream: UpstreamClient) -> Self {
        Self {
            upstream,
            registry: ActivityRegistry::new(),
            started_at: Instant::now(),
            started_at_utc: Utc::now(),
        }
    }

    /// Seconds since the process started serving.
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Wall-clock start time.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at_utc
    }
}

/// Build the `/api` router over shared state.
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/meta", get(meta_handler))
        .route("/api/proxy", get(proxy_handler))
        .route("/api/download", get(download_handler))
        .route("/api/export", get(download_handler))
        .route("/api/registry", get(registry_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

/// Uniform JSON body for unmatched routes.
async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": {
                "type": "not_found",
                "message": "No such endpoint",
            }
        })),
    )
}
