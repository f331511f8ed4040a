//! Docgate gateway server
//!
//! Local streaming gateway for embedding and exporting hosted documents.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Response, StatusCode};
use bytes::Bytes;
use clap::Parser;
use http_body_util::Full;
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
};
use tracing::{error, info};

use docgate::handlers::{api_router, AppState};
use docgate::tracing_middleware::{init_tracing, request_tracing_layer};
use docgate::upstream::{UpstreamClient, DEFAULT_UPSTREAM_BASE};

/// Docgate gateway server
#[derive(Parser, Debug)]
#[command(name = "docgate")]
#[command(version)]
#[command(about = "Streaming gateway for embedding and exporting hosted documents")]
#[command(long_about = r#"Docgate — Streaming Document Gateway

Mediates access to a hosted document service for a local UI: resolves
document identifiers from pasted URLs, scrapes titles, and re-streams
rendered or exported document bytes with frame embedding permitted.

EXAMPLES:
  # Start on the default port
  docgate

  # Custom port with verbose logging
  docgate --port 9090 --verbose
"#)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8787")]
    port: u16,

    /// Host to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Base URL of the upstream document service
    #[arg(long, default_value = DEFAULT_UPSTREAM_BASE)]
    upstream_base: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    init_tracing(if args.verbose { "debug" } else { "info" });

    let upstream = UpstreamClient::new(&args.upstream_base)?;
    let state = Arc::new(AppState::new(upstream));

    let app = api_router(state)
        .layer(request_tracing_layer())
        .layer(CorsLayer::permissive())
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(CatchPanicLayer::custom(handle_panic));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        "docgate {} listening on {} (upstream: {})",
        docgate::VERSION,
        addr,
        args.upstream_base
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("docgate stopped");
    Ok(())
}

/// Process-wide fallback: any otherwise-unhandled panic in a pipeline
/// becomes a uniform JSON 500. Detail is logged server-side only.
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response<Full<Bytes>> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    error!("handler panicked: {detail}");

    let body = serde_json::json!({
        "error": {
            "type": "internal_error",
            "message": "Internal server error",
        }
    });

    let mut response = Response::new(Full::from(body.to_string()));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

/// Resolve on ctrl-c or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c, shutting down"),
        _ = terminate => info!("received terminate signal, shutting down"),
    }
}
