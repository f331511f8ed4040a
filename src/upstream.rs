//! Upstream document service client
//!
//! Issues outbound HTTP requests to the hosted document service for three
//! purposes: metadata fetch (fully buffered HTML), rendered-view fetch
//! (live byte stream), and export fetch (live byte stream).
//!
//! Requests identify themselves with a browser-like `User-Agent`; the
//! upstream's bot detection rejects anonymous clients, so this header is a
//! required behavior, not a nicety. Every call gets a single attempt with a
//! fixed deadline; failures surface promptly rather than being masked by
//! retries.

use std::time::Duration;

use bytes::Bytes;
use futures::Stream;
use reqwest::{header, Client, StatusCode};
use tracing::{debug, instrument};

use crate::error::{GatewayError, GatewayResult};
use crate::resolver::{DocRef, RenderMode};

/// Default upstream service base URL.
pub const DEFAULT_UPSTREAM_BASE: &str = "https://docs.google.com";

/// Per-call deadline for upstream requests, in seconds.
///
/// For the fully-buffered metadata fetch this bounds the whole request.
/// For the streaming fetches it bounds connection establishment and each
/// read, never the total transfer: a large document relayed to a slow
/// consumer may legitimately stream for longer, and only a stalled
/// upstream counts as a timeout.
pub const UPSTREAM_TIMEOUT_SECS: u64 = 15;

/// Browser-like identifying header sent with every upstream request.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// A live upstream response ready to be relayed.
pub struct UpstreamStream {
    status: StatusCode,
    content_type: Option<String>,
    response: reqwest::Response,
}

impl UpstreamStream {
    pub(crate) fn from_response(response: reqwest::Response) -> Self {
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Self {
            status: response.status(),
            content_type,
            response,
        }
    }

    /// Upstream HTTP status (always success once constructed).
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Upstream `Content-Type`, if one was provided.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Consume the response into a byte stream.
    ///
    /// The stream is pull-based: each chunk is read from the upstream
    /// connection only when the consumer polls for it, so downstream
    /// backpressure throttles the upstream read. Dropping the stream
    /// releases the upstream connection.
    pub fn into_byte_stream(self) -> impl Stream<Item = reqwest::Result<Bytes>> {
        self.response.bytes_stream()
    }
}

/// Client for the upstream document service.
#[derive(Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: String,
}

impl UpstreamClient {
    /// Create a client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> GatewayResult<Self> {
        Self::with_deadline(base_url, Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
    }

    /// Create a client with an explicit connect/per-read deadline.
    fn with_deadline(base_url: impl Into<String>, deadline: Duration) -> GatewayResult<Self> {
        let http = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .gzip(true)
            .connect_timeout(deadline)
            .read_timeout(deadline)
            .build()
            .map_err(|e| GatewayError::Internal(format!("http client init: {e}")))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    /// Create a client against the production upstream.
    pub fn with_defaults() -> GatewayResult<Self> {
        Self::new(DEFAULT_UPSTREAM_BASE)
    }

    /// The rendered-view endpoint for a document and mode.
    pub fn render_url(&self, doc: &DocRef, mode: RenderMode) -> String {
        format!(
            "{}/document/d/{}/{}",
            self.base_url,
            doc.id,
            mode.path_segment()
        )
    }

    /// The export endpoint for a document and format token.
    ///
    /// The format is passed through verbatim; the upstream service owns
    /// format validation.
    pub fn export_url(&self, doc: &DocRef, format: &str) -> String {
        format!(
            "{}/document/d/{}/export?format={}",
            self.base_url, doc.id, format
        )
    }

    /// Fetch the rendered HTML for a document, fully buffered.
    ///
    /// Used by the metadata path, which always requests [`RenderMode::Basic`]
    /// to guarantee scrapeable markup regardless of the caller's mode.
    #[instrument(skip(self), fields(id = %doc.id))]
    pub async fn fetch_rendered_html(
        &self,
        doc: &DocRef,
        mode: RenderMode,
    ) -> GatewayResult<String> {
        let url = self.render_url(doc, mode);
        debug!("fetching rendered html from {}", url);

        // Buffered fetch: the deadline covers the whole request.
        let response = self
            .checked_get(&url, Some(Duration::from_secs(UPSTREAM_TIMEOUT_SECS)))
            .await?;
        response
            .text()
            .await
            .map_err(|e| classify_transport_error(e, "reading rendered body"))
    }

    /// Open a live byte stream of the rendered view for a document.
    #[instrument(skip(self), fields(id = %doc.id))]
    pub async fn fetch_rendered_stream(
        &self,
        doc: &DocRef,
        mode: RenderMode,
    ) -> GatewayResult<UpstreamStream> {
        let url = self.render_url(doc, mode);
        debug!("opening rendered stream from {}", url);

        let response = self.checked_get(&url, None).await?;
        Ok(UpstreamStream::from_response(response))
    }

    /// Open a live byte stream of the exported document.
    #[instrument(skip(self), fields(id = %doc.id, format = %format))]
    pub async fn fetch_export_stream(
        &self,
        doc: &DocRef,
        format: &str,
    ) -> GatewayResult<UpstreamStream> {
        let url = self.export_url(doc, format);
        debug!("opening export stream from {}", url);

        let response = self.checked_get(&url, None).await?;
        Ok(UpstreamStream::from_response(response))
    }

    /// Issue a GET and fold network failures and non-success statuses into
    /// the single upstream-unavailable condition. One attempt, no retries.
    ///
    /// `total_deadline` bounds the whole request including the body; the
    /// streaming paths pass `None` so that only the client's connect and
    /// per-read deadlines apply and a long relay is never cut short.
    async fn checked_get(
        &self,
        url: &str,
        total_deadline: Option<Duration>,
    ) -> GatewayResult<reqwest::Response> {
        let mut request = self.http.get(url);
        if let Some(deadline) = total_deadline {
            request = request.timeout(deadline);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_transport_error(e, "connecting"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Upstream(format!(
                "upstream answered {}",
                status.as_u16()
            )));
        }
        Ok(response)
    }
}

/// Map a transport error to the gateway taxonomy, keeping the timeout
/// condition distinct from generic network failure.
fn classify_transport_error(err: reqwest::Error, phase: &str) -> GatewayError {
    if err.is_timeout() {
        GatewayError::UpstreamTimeout
    } else {
        GatewayError::Upstream(format!("{phase}: {err}"))
    }
}
