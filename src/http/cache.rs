//! Conditional request helpers
//!
//! `ETag` generation and validation plus `Last-Modified` /
//! `If-Modified-Since` handling for the static file layer.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::SystemTime;

use chrono::{DateTime, Utc};

/// Generate an `ETag` from file content using fast hashing
///
/// # Returns
/// Quoted `ETag` string, e.g., `"abc123def"`
#[must_use]
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Check if the client's `If-None-Match` header matches the `ETag`
///
/// Supports a single `ETag`, a comma-separated list, and the `*`
/// wildcard. Returns true if matched (the response should be 304).
#[must_use]
pub fn etag_matches(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}

/// Format a filesystem timestamp as an RFC 7231 HTTP date
#[must_use]
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Check whether the file is unchanged since the client's
/// `If-Modified-Since` timestamp.
///
/// Comparison is at second granularity, matching the resolution of the
/// header format. An absent or unparseable header never matches.
#[must_use]
pub fn unmodified_since(if_modified_since: Option<&str>, mtime: SystemTime) -> bool {
    let Some(header) = if_modified_since else {
        return false;
    };
    let Ok(since) = DateTime::parse_from_rfc2822(header) else {
        return false;
    };
    DateTime::<Utc>::from(mtime).timestamp() <= since.timestamp()
}
