//! Render-proxy and export stream endpoints
//!
//! Both endpoints resolve the caller's URL, open a live upstream stream,
//! and hand it to the relay. No payload is buffered; failures before the
//! first byte produce an explicit error response, failures after it
//! terminate the connection.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Response,
};
use metrics::counter;
use serde::Deserialize;
use tracing::{info, instrument};

use super::AppState;
use crate::error::{GatewayError, GatewayResult};
use crate::relay::{relay_attachment, relay_html};
use crate::resolver::{resolve_doc_id, RenderMode, DEFAULT_EXPORT_FORMAT};

/// Query parameters for `GET /api/proxy`.
#[derive(Debug, Deserialize)]
pub struct ProxyParams {
    /// Document URL to resolve.
    #[serde(default)]
    pub url: Option<String>,
    /// Rendering variant; unrecognized values fall back to `basic`.
    #[serde(default)]
    pub mode: Option<String>,
}

/// Query parameters for `GET /api/download` and `GET /api/export`.
#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    /// Document URL to resolve.
    #[serde(default)]
    pub url: Option<String>,
    /// Export format token, passed to the upstream verbatim; defaults to
    /// `pdf`.
    #[serde(default)]
    pub format: Option<String>,
}

/// Handle `GET /api/proxy`: relay the rendered document as embeddable HTML.
#[instrument(skip(state, params))]
pub async fn proxy_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ProxyParams>,
) -> GatewayResult<Response> {
    let url = params.url.as_deref().unwrap_or_default();
    let doc = resolve_doc_id(url).ok_or(GatewayError::InvalidDocUrl)?;
    let mode = RenderMode::from_param(params.mode.as_deref());

    let upstream = state.upstream.fetch_rendered_stream(&doc, mode).await?;

    counter!("proxy_streams_total").increment(1);
    info!(id = %doc.id, ?mode, "relaying rendered document");

    Ok(relay_html(upstream))
}

/// Handle `GET /api/download`: relay the exported document as an attachment.
///
/// Export failures surface as a plain server error rather than a gateway
/// error, matching the caller contract for this path.
#[instrument(skip(state, params))]
pub async fn download_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DownloadParams>,
) -> GatewayResult<Response> {
    let url = params.url.as_deref().unwrap_or_default();
    let doc = resolve_doc_id(url).ok_or(GatewayError::InvalidDocUrl)?;
    let format = params
        .format
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| DEFAULT_EXPORT_FORMAT.to_string());

    let upstream = state
        .upstream
        .fetch_export_stream(&doc, &format)
        .await
        .map_err(|e| match e {
            GatewayError::Upstream(detail) => GatewayError::ExportFailed(detail),
            GatewayError::UpstreamTimeout => GatewayError::ExportFailed("timed out".to_string()),
            other => other,
        })?;

    counter!("export_streams_total", "format" => format.clone()).increment(1);
    info!(id = %doc.id, format = %format, "relaying exported document");

    Ok(relay_attachment(upstream, &doc, &format))
}
