//! Request tracing and log initialization
//!
//! Every request runs inside a span carrying a generated request id, the
//! method, and the path; responses are logged with status and latency.
//! Output format is JSON in production and pretty in development, switched
//! by the `DOCGATE_LOG_FORMAT` environment variable (`json` or `pretty`),
//! with level filtering via `RUST_LOG`.

use axum::{body::Body, http::Request};
use std::time::Duration;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::{MakeSpan, OnResponse, TraceLayer},
};
use tracing::{info_span, Level, Span};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "DOCGATE_LOG_FORMAT";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Structured JSON lines, one per event.
    Json,
    /// Human-readable output for development.
    Pretty,
}

impl LogFormat {
    /// Resolve the format from the environment, defaulting to pretty.
    pub fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV).as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// `default_level` applies when `RUST_LOG` is unset.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    match LogFormat::from_env() {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

/// Span maker attaching a fresh request id to every request.
#[derive(Clone, Debug)]
pub struct RequestSpan;

impl MakeSpan<Body> for RequestSpan {
    fn make_span(&mut self, request: &Request<Body>) -> Span {
        info_span!(
            "http_request",
            request_id = %Uuid::new_v4(),
            method = %request.method(),
            path = %request.uri().path(),
        )
    }
}

/// Response hook logging status and latency inside the request span.
#[derive(Clone, Debug)]
pub struct ResponseLog;

impl<B> OnResponse<B> for ResponseLog {
    fn on_response(
        self,
        response: &axum::http::Response<B>,
        latency: Duration,
        _span: &Span,
    ) {
        tracing::event!(
            Level::INFO,
            status = response.status().as_u16(),
            latency_ms = latency.as_millis() as u64,
            "request completed"
        );
    }
}

/// Build the request tracing layer for the gateway router.
pub fn request_tracing_layer(
) -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan, (), ResponseLog> {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_request(())
        .on_response(ResponseLog)
}
