//! Streaming pass-through from upstream to caller
//!
//! Forwards an upstream response body to the caller as a live byte stream,
//! translating a minimal set of headers. The relay never buffers the whole
//! payload: the response body wraps the upstream stream directly, so hyper
//! pulls one chunk at a time as the caller's connection accepts writes. A
//! slow consumer therefore throttles the upstream read, and a caller
//! disconnect drops the stream, releasing the upstream connection.
//!
//! All headers are set before the first byte is written. If the upstream
//! stream errors after that point no status change is possible; the body
//! stream yields the error and the connection terminates.

use axum::{
    body::Body,
    http::header,
    response::{IntoResponse, Response},
};
use futures::TryStreamExt;
use tracing::warn;

use crate::resolver::DocRef;
use crate::upstream::UpstreamStream;

/// Content type served on the render-proxy path when the upstream does not
/// declare one.
pub const PROXY_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Fallback content type for export payloads.
pub const EXPORT_CONTENT_TYPE: &str = "application/octet-stream";

/// Explicitly permissive frame policy for proxied documents.
///
/// The gateway exists to let a foreign document render inside the caller's
/// own page, so the proxy path must allow embedding from any origin. No
/// `X-Frame-Options` header is ever set on relayed responses.
pub const PERMISSIVE_FRAME_POLICY: &str = "frame-ancestors *";

/// Filename prefix for export attachments.
const ATTACHMENT_PREFIX: &str = "document";

/// Relay a rendered-view stream as an embeddable HTML response.
pub fn relay_html(upstream: UpstreamStream) -> Response {
    let content_type = upstream
        .content_type()
        .unwrap_or(PROXY_CONTENT_TYPE)
        .to_string();

    (
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CONTENT_SECURITY_POLICY,
                PERMISSIVE_FRAME_POLICY.to_string(),
            ),
        ],
        relay_body(upstream),
    )
        .into_response()
}

/// Relay an export stream as a downloadable attachment.
///
/// Sets a `Content-Disposition` instructing the receiving client to save the
/// stream under a synthesized filename embedding the document identifier and
/// the requested format.
pub fn relay_attachment(upstream: UpstreamStream, doc: &DocRef, format: &str) -> Response {
    let content_type = upstream
        .content_type()
        .unwrap_or(EXPORT_CONTENT_TYPE)
        .to_string();
    let disposition = format!(
        "attachment; filename=\"{}\"",
        attachment_filename(doc, format)
    );

    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        relay_body(upstream),
    )
        .into_response()
}

/// Synthesize the attachment filename for an export.
///
/// The format token reaches the upstream verbatim, but the filename lands in
/// a response header, so it is reduced to a header-safe character set here.
pub fn attachment_filename(doc: &DocRef, format: &str) -> String {
    let safe_format: String = format
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    format!("{}_{}.{}", ATTACHMENT_PREFIX, doc.id, safe_format)
}

/// Wrap the upstream byte stream as a response body.
///
/// An error mid-stream is logged and surfaced into the body, which aborts
/// the transfer; headers have already been sent by then, so no recovery is
/// attempted.
fn relay_body(upstream: UpstreamStream) -> Body {
    Body::from_stream(
        upstream
            .into_byte_stream()
            .inspect_err(|e| warn!("upstream stream interrupted mid-relay: {}", e)),
    )
}
