//! Metadata lookup and activity registry endpoints
//!
//! `GET /api/meta` resolves the caller's URL to a document identifier,
//! scrapes a title from the upstream's basic rendering, records the result
//! in the activity registry, and returns the metadata record.
//!
//! `GET /api/registry` returns the most recent lookups, newest first.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::AppState;
use crate::error::{GatewayError, GatewayResult};
use crate::extract::extract_title;
use crate::registry::{MetadataRecord, DEFAULT_CAPACITY};
use crate::resolver::{resolve_doc_id, RenderMode};

/// Query parameters for `GET /api/meta`.
#[derive(Debug, Deserialize)]
pub struct MetaParams {
    /// Document URL to resolve.
    #[serde(default)]
    pub url: Option<String>,
}

/// Query parameters for `GET /api/registry`.
///
/// `limit` is kept as a raw string and parsed leniently: this endpoint
/// never fails, so a malformed value falls back to the default rather
/// than rejecting the request at extraction time.
#[derive(Debug, Deserialize)]
pub struct RegistryParams {
    /// Maximum number of records to return.
    #[serde(default)]
    pub limit: Option<String>,
}

/// Response body for `GET /api/registry`.
#[derive(Debug, Serialize)]
pub struct RegistryResponse {
    /// Number of records returned.
    pub count: usize,
    /// Records, newest first.
    pub records: Vec<MetadataRecord>,
}

/// Handle `GET /api/meta`.
///
/// The scrape always requests [`RenderMode::Basic`] so the markup stays
/// scrapeable regardless of any caller preference; title extraction is
/// best-effort and a missing title degrades to a placeholder rather than
/// failing the request. An unresolvable URL mutates nothing.
#[instrument(skip(state, params))]
pub async fn meta_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MetaParams>,
) -> GatewayResult<Json<MetadataRecord>> {
    let url = params.url.as_deref().unwrap_or_default();
    let doc = resolve_doc_id(url).ok_or(GatewayError::InvalidDocUrl)?;

    let html = state
        .upstream
        .fetch_rendered_html(&doc, RenderMode::Basic)
        .await?;
    let title = extract_title(&html);

    let record = MetadataRecord::new(&doc, title);
    state.registry.record(record.clone()).await;

    counter!("meta_lookups_total").increment(1);
    info!(id = %record.id, title = %record.title, "metadata lookup complete");

    Ok(Json(record))
}

/// Handle `GET /api/registry`. Never fails.
#[instrument(skip(state, params))]
pub async fn registry_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RegistryParams>,
) -> Json<RegistryResponse> {
    let limit = params
        .limit
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(DEFAULT_CAPACITY);
    let records = state.registry.recent(limit).await;

    Json(RegistryResponse {
        count: records.len(),
        records,
    })
}
