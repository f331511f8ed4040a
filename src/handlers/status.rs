//! Server status endpoint

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::registry::RegistryStats;

/// Operational descriptor returned by `GET /api/status`. Never fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Always `"ok"` while the process is serving.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Crate version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_seconds: u64,
    /// Wall-clock start time.
    pub started_at: DateTime<Utc>,
    /// Activity registry usage counters.
    pub registry: RegistryStats,
}

/// Handle `GET /api/status`.
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        service: crate::NAME.to_string(),
        version: crate::VERSION.to_string(),
        uptime_seconds: state.uptime_seconds(),
        started_at: state.started_at(),
        registry: state.registry.stats().await,
    })
}
