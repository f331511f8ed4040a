//! Gateway error taxonomy and HTTP mapping
//!
//! A single [`GatewayError`] type covers every failure a request pipeline can
//! surface, with one authoritative mapping to HTTP status codes and JSON
//! bodies via [`IntoResponse`]. Response bodies stay generic; upstream detail
//! is logged server-side only.
//!
//! Failure taxonomy:
//!
//! - Invalid input (no resolvable identifier) → `400`
//! - Upstream unavailable (network error, non-success status, timeout) →
//!   `502` on the metadata and render-proxy paths, `500` on the export path
//! - Title extraction failure is *not* an error: the extractor substitutes a
//!   placeholder and the request succeeds
//! - A mid-stream relay interruption happens after headers are sent and is
//!   handled inside the relay, not here

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use metrics::counter;
use tracing::{error, warn};

/// Convenience result alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors surfaced by the gateway's request pipelines.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The supplied URL does not contain a resolvable document identifier.
    #[error("Invalid Google Doc URL")]
    InvalidDocUrl,

    /// The upstream service could not be reached or answered with a
    /// non-success status.
    #[error("Upstream document service unavailable: {0}")]
    Upstream(String),

    /// The upstream service did not answer within the per-call deadline.
    #[error("Upstream document service timed out")]
    UpstreamTimeout,

    /// An export stream could not be established.
    #[error("Export failed: {0}")]
    ExportFailed(String),

    /// Catch-all for otherwise unhandled pipeline failures.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// The HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidDocUrl => StatusCode::BAD_REQUEST,
            GatewayError::Upstream(_) | GatewayError::UpstreamTimeout => StatusCode::BAD_GATEWAY,
            GatewayError::ExportFailed(_) | GatewayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable error type token.
    pub fn error_type(&self) -> &'static str {
        match self {
            GatewayError::InvalidDocUrl => "invalid_doc_url",
            GatewayError::Upstream(_) => "upstream_unavailable",
            GatewayError::UpstreamTimeout => "upstream_timeout",
            GatewayError::ExportFailed(_) => "export_failed",
            GatewayError::Internal(_) => "internal_error",
        }
    }

    /// Generic client-facing message. Never includes upstream detail.
    fn public_message(&self) -> &'static str {
        match self {
            GatewayError::InvalidDocUrl => "Invalid Google Doc URL",
            GatewayError::Upstream(_) => "Upstream document service is unavailable",
            GatewayError::UpstreamTimeout => "Upstream document service timed out",
            GatewayError::ExportFailed(_) => "Failed to export document",
            GatewayError::Internal(_) => "Internal server error",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_type = self.error_type();

        // Full detail stays server-side.
        match &self {
            GatewayError::InvalidDocUrl => warn!("rejected request: {}", self),
            other => error!("request failed: {}", other),
        }

        counter!("gateway_errors_total", "type" => error_type).increment(1);

        let body = serde_json::json!({
            "error": {
                "type": error_type,
                "message": self.public_message(),
            }
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            GatewayError::InvalidDocUrl.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::Upstream("refused".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            GatewayError::UpstreamTimeout.status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            GatewayError::ExportFailed("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GatewayError::Internal("oops".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_into_response_uses_mapped_status() {
        let response = GatewayError::InvalidDocUrl.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = GatewayError::UpstreamTimeout.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_public_message_hides_upstream_detail() {
        let err = GatewayError::Upstream("connection reset by 10.0.0.7".into());
        assert!(!err.public_message().contains("10.0.0.7"));
    }
}
