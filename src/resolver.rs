//! Document identifier resolution
//!
//! The upstream service encodes a document's canonical identifier
//! positionally in its URL scheme, as a path segment of the form
//! `/d/<token>`. This module owns the single authoritative pattern for
//! pulling that token out of an arbitrary caller-supplied URL string.
//! Every handler resolves identifiers through [`resolve_doc_id`]; nothing
//! else in the crate re-derives the pattern.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Default export format when the caller does not specify one.
pub const DEFAULT_EXPORT_FORMAT: &str = "pdf";

/// A resolved document reference.
///
/// Only ever constructed from a successfully matched identifier pattern;
/// absence of a match yields `None` from [`resolve_doc_id`], never an empty
/// or placeholder reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocRef {
    /// The canonical identifier the upstream service uses for the document.
    pub id: String,
}

impl DocRef {
    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for DocRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Which upstream rendering variant to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Simplified mobile rendering; guaranteed scrapeable markup.
    #[default]
    Basic,
    /// Richer read-only preview rendering.
    Preview,
}

impl RenderMode {
    /// Parse a caller-supplied mode parameter.
    ///
    /// Any unrecognized or absent value falls back to [`RenderMode::Basic`].
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("preview") => RenderMode::Preview,
            _ => RenderMode::Basic,
        }
    }

    /// The upstream path segment selecting this rendering variant.
    pub fn path_segment(&self) -> &'static str {
        match self {
            RenderMode::Basic => "mobilebasic",
            RenderMode::Preview => "preview",
        }
    }
}

fn doc_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/d/([a-zA-Z0-9_-]+)").unwrap())
}

/// Resolve a document identifier from an arbitrary input URL string.
///
/// Matches the first `/d/<token>` path segment where `<token>` consists of
/// letters, digits, hyphen, and underscore. No further normalization is
/// applied. Returns `None` when no such segment exists; that is the sole
/// failure mode and carries no further detail.
pub fn resolve_doc_id(url: &str) -> Option<DocRef> {
    doc_id_pattern()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| DocRef {
            id: m.as_str().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_standard_edit_url() {
        let doc = resolve_doc_id("https://docs.google.com/document/d/ABC123xyz/edit").unwrap();
        assert_eq!(doc.id, "ABC123xyz");
    }

    #[test]
    fn test_resolve_with_query_and_fragment() {
        let doc =
            resolve_doc_id("https://docs.google.com/document/d/a-b_c9/edit?usp=sharing#frag")
                .unwrap();
        assert_eq!(doc.id, "a-b_c9");
    }

    #[test]
    fn test_resolve_first_match_wins() {
        let doc = resolve_doc_id("/d/first/and/d/second").unwrap();
        assert_eq!(doc.id, "first");
    }

    #[test]
    fn test_resolve_stops_at_identifier_alphabet() {
        // The dot ends the token match.
        let doc = resolve_doc_id("https://host/d/tok.en").unwrap();
        assert_eq!(doc.id, "tok");
    }

    #[test]
    fn test_resolve_missing_segment() {
        assert!(resolve_doc_id("https://example.com/documents/123").is_none());
        assert!(resolve_doc_id("not-a-doc-url").is_none());
        assert!(resolve_doc_id("").is_none());
    }

    #[test]
    fn test_resolve_bare_marker_has_no_token() {
        assert!(resolve_doc_id("https://docs.google.com/document/d/").is_none());
    }

    #[test]
    fn test_render_mode_from_param() {
        assert_eq!(RenderMode::from_param(None), RenderMode::Basic);
        assert_eq!(RenderMode::from_param(Some("basic")), RenderMode::Basic);
        assert_eq!(RenderMode::from_param(Some("preview")), RenderMode::Preview);
        assert_eq!(RenderMode::from_param(Some("garbage")), RenderMode::Basic);
        assert_eq!(RenderMode::from_param(Some("")), RenderMode::Basic);
    }

    #[test]
    fn test_render_mode_path_segments() {
        assert_eq!(RenderMode::Basic.path_segment(), "mobilebasic");
        assert_eq!(RenderMode::Preview.path_segment(), "preview");
    }
}
