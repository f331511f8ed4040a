//! Title extraction from scraped markup
//!
//! Pulls a human-readable document title out of an upstream HTML payload.
//! Extraction is pure and total: malformed or title-less markup yields the
//! [`UNTITLED_PLACEHOLDER`] rather than an error, so a degraded scrape never
//! fails a metadata request.

use std::sync::OnceLock;

use regex::Regex;

/// Placeholder title used when the markup carries no usable title tag.
pub const UNTITLED_PLACEHOLDER: &str = "Untitled document";

/// Service-specific suffix the upstream appends to page titles.
const SERVICE_TITLE_SUFFIX: &str = " - Google Docs";

fn title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap())
}

/// Extract the first title-tag content from an HTML payload.
///
/// The raw title is entity-decoded, whitespace-trimmed, and stripped of the
/// upstream's `" - Google Docs"` suffix when present. Returns
/// [`UNTITLED_PLACEHOLDER`] when no non-empty title is found.
pub fn extract_title(html: &str) -> String {
    let raw = match title_pattern().captures(html).and_then(|c| c.get(1)) {
        Some(m) => m.as_str(),
        None => return UNTITLED_PLACEHOLDER.to_string(),
    };

    let decoded = decode_entities(raw);
    let no_trailing = decoded.trim_end();
    let stripped = no_trailing
        .strip_suffix(SERVICE_TITLE_SUFFIX)
        .unwrap_or(no_trailing)
        .trim();

    if stripped.is_empty() {
        UNTITLED_PLACEHOLDER.to_string()
    } else {
        stripped.to_string()
    }
}

/// Decode HTML entities, falling back to the common subset when the
/// full decoder rejects the input.
fn decode_entities(text: &str) -> String {
    match htmlescape::decode_html(text) {
        Ok(decoded) => decoded,
        Err(_) => text
            .replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&apos;", "'"),
    }
}
