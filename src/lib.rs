//! Docgate - Streaming Document Gateway
//!
//! This crate provides a local HTTP gateway that mediates access to an
//! externally hosted document service: given a document URL it resolves a
//! stable identifier, scrapes metadata, and re-streams rendered or exported
//! document bytes back to the caller, bypassing the browser's cross-origin
//! restrictions behind a uniform local API.
//!
//! # Features
//!
//! - **Identifier Resolution**: one authoritative pattern for extracting a
//!   document id from arbitrary URLs
//! - **Upstream Client**: single-attempt, deadline-bounded fetches with a
//!   browser-like identity
//! - **Stream Relay**: flow-controlled byte forwarding with header
//!   translation, no full-payload buffering
//! - **Metadata Extraction**: total, never-failing title scraping
//! - **Activity Registry**: bounded, newest-first log of metadata lookups
//! - **Error Handling**: one error taxonomy with HTTP status mapping
//! - **Request Tracing**: structured request logging with request ids
//!
//! # Architecture
//!
//! ```text
//! Caller ──▶ Gateway Router ──▶ Identifier Resolver
//!                │                      │
//!                ▼                      ▼
//!         ┌───────────┐        ┌────────────────┐
//!         │ Metadata  │        │ Upstream Client│──▶ document service
//!         │ Extractor │        └───────┬────────┘
//!         └─────┬─────┘                │
//!               │              ┌───────▼────────┐
//!               ▼              │  Stream Relay  │──▶ streamed response
//!       ┌──────────────┐       └────────────────┘
//!       │   Activity   │
//!       │   Registry   │──▶ GET /api/registry
//!       └──────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use docgate::handlers::{api_router, AppState};
//! use docgate::upstream::UpstreamClient;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let upstream = UpstreamClient::with_defaults()?;
//!     let state = Arc::new(AppState::new(upstream));
//!     let app = api_router(state);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8787").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod extract;
pub mod handlers;
pub mod registry;
pub mod relay;
pub mod resolver;
pub mod tracing_middleware;
pub mod upstream;

// Re-exports for convenience
pub use error::{GatewayError, GatewayResult};
pub use extract::{extract_title, UNTITLED_PLACEHOLDER};
pub use handlers::{api_router, AppState};
pub use registry::{ActivityRegistry, MetadataRecord, RegistryStats};
pub use relay::{relay_attachment, relay_html, PERMISSIVE_FRAME_POLICY};
pub use resolver::{resolve_doc_id, DocRef, RenderMode};
pub use tracing_middleware::{init_tracing, request_tracing_layer, LogFormat};
pub use upstream::{UpstreamClient, UpstreamStream, DEFAULT_UPSTREAM_BASE};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
