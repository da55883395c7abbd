//! Byte-range request parsing
//!
//! Single-range `bytes=` parsing per RFC 7233, so partially fetched
//! assets can resume instead of restarting.

/// Inclusive byte range resolved against a concrete file size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    /// Number of bytes the range covers
    #[must_use]
    pub const fn length(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Outcome of parsing a Range header against a file of known size
#[derive(Debug, PartialEq, Eq)]
pub enum RangeOutcome {
    /// Usable range, serve 206
    Satisfiable(ByteRange),
    /// Range exists but lies outside the file, serve 416
    Unsatisfiable,
    /// Absent, malformed, non-byte unit, or multi-range: serve the full file
    Ignored,
}

/// Parse a single `bytes=` Range header against the file size.
///
/// Supported forms: `bytes=a-b`, `bytes=a-`, `bytes=-n`. Multi-range
/// requests and non-byte units are ignored rather than rejected.
///
/// # Examples
/// ```
/// use pwa_server::http::range::{parse_range, ByteRange, RangeOutcome};
///
/// let outcome = parse_range(Some("bytes=0-99"), 1000);
/// assert_eq!(outcome, RangeOutcome::Satisfiable(ByteRange { start: 0, end: 99 }));
///
/// assert_eq!(parse_range(None, 1000), RangeOutcome::Ignored);
/// ```
#[must_use]
pub fn parse_range(header: Option<&str>, file_size: usize) -> RangeOutcome {
    let Some(header) = header else {
        return RangeOutcome::Ignored;
    };
    let Some(spec) = header.strip_prefix("bytes=") else {
        return RangeOutcome::Ignored;
    };
    // Single range only
    if spec.contains(',') {
        return RangeOutcome::Ignored;
    }
    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeOutcome::Ignored;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    // Suffix form: "-500" means the last 500 bytes
    if start_str.is_empty() {
        return parse_suffix(end_str, file_size);
    }

    let Ok(start) = start_str.parse::<usize>() else {
        return RangeOutcome::Ignored;
    };
    if start >= file_size {
        return RangeOutcome::Unsatisfiable;
    }
    let end = if end_str.is_empty() {
        file_size - 1
    } else {
        let Ok(end) = end_str.parse::<usize>() else {
            return RangeOutcome::Ignored;
        };
        if end < start {
            return RangeOutcome::Unsatisfiable;
        }
        end.min(file_size - 1)
    };
    RangeOutcome::Satisfiable(ByteRange { start, end })
}

fn parse_suffix(suffix_str: &str, file_size: usize) -> RangeOutcome {
    let Ok(suffix) = suffix_str.parse::<usize>() else {
        return RangeOutcome::Ignored;
    };
    if suffix == 0 || file_size == 0 {
        return RangeOutcome::Unsatisfiable;
    }
    // A suffix longer than the file covers the whole file
    RangeOutcome::Satisfiable(ByteRange {
        start: file_size.saturating_sub(suffix),
        end: file_size - 1,
    })
}
