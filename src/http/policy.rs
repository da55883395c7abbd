//! Cache-override policy module
//!
//! Decides which cache headers a response gets based on the requested
//! file's basename and extension. A stale service worker script is
//! compared against its own cached copy and never fires the install
//! event, which silently disables the app's whole update path, so a
//! small set of critical files must never be served from browser HTTP
//! cache at all. Scripts, styles, and markup are cached but revalidated
//! on every request. Everything else keeps whatever headers the static
//! file layer sent.

use hyper::header::{HeaderValue, CACHE_CONTROL, EXPIRES, PRAGMA};
use hyper::HeaderMap;

/// `Cache-Control` value for files that must never come from cache
const BYPASS_CACHE_CONTROL: &str = "no-cache, no-store, must-revalidate";

/// `Cache-Control` value for files revalidated on every request
const REVALIDATE_CACHE_CONTROL: &str = "no-cache";

/// Cache classification for a request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheClass {
    /// Never serve from browser cache (service worker, manifest)
    Bypass,
    /// Cache, but ask the server before reusing the cached copy
    Revalidate,
    /// Leave the static file layer's default headers untouched
    Preserve,
}

/// Cache-override rule sets, fixed at startup and never mutated.
#[derive(Debug, Clone)]
pub struct CacheRules {
    /// Exact basenames that bypass the browser cache entirely
    no_cache_names: Vec<String>,
    /// Extensions (with leading dot) that revalidate on every request
    revalidate_extensions: Vec<String>,
}

impl Default for CacheRules {
    fn default() -> Self {
        Self::new(["sw.js", "manifest.json"], [".js", ".css", ".html"])
    }
}

impl CacheRules {
    /// Build rules from explicit sets.
    pub fn new<N, E>(no_cache_names: N, revalidate_extensions: E) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self {
            no_cache_names: no_cache_names.into_iter().map(Into::into).collect(),
            revalidate_extensions: revalidate_extensions
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }

    /// Classify a raw request path.
    ///
    /// Pure function of the path string: the query string and fragment
    /// are stripped before the basename is extracted, matching is
    /// case-sensitive, and the no-cache set wins over the extension
    /// rule (sw.js also ends in `.js`, and must not fall through to the
    /// weaker rule).
    ///
    /// # Examples
    /// ```
    /// use pwa_server::http::policy::{CacheClass, CacheRules};
    ///
    /// let rules = CacheRules::default();
    /// assert_eq!(rules.classify("/sw.js?v=2"), CacheClass::Bypass);
    /// assert_eq!(rules.classify("/app.js"), CacheClass::Revalidate);
    /// assert_eq!(rules.classify("/logo.png"), CacheClass::Preserve);
    /// ```
    #[must_use]
    pub fn classify(&self, path: &str) -> CacheClass {
        let name = basename(path);
        if self.no_cache_names.iter().any(|n| n == name) {
            return CacheClass::Bypass;
        }
        let ext = extension(name);
        if !ext.is_empty() && self.revalidate_extensions.iter().any(|e| e == ext) {
            return CacheClass::Revalidate;
        }
        CacheClass::Preserve
    }

    /// Apply the policy to an outgoing header map.
    ///
    /// Inserts use replace semantics, so the override wins over any
    /// cache headers already present on the response.
    pub fn apply(&self, path: &str, headers: &mut HeaderMap) {
        match self.classify(path) {
            CacheClass::Bypass => {
                headers.insert(
                    CACHE_CONTROL,
                    HeaderValue::from_static(BYPASS_CACHE_CONTROL),
                );
                headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
                headers.insert(EXPIRES, HeaderValue::from_static("0"));
            }
            CacheClass::Revalidate => {
                headers.insert(
                    CACHE_CONTROL,
                    HeaderValue::from_static(REVALIDATE_CACHE_CONTROL),
                );
            }
            CacheClass::Preserve => {}
        }
    }

    /// Sorted no-cache basenames, for the startup banner
    #[must_use]
    pub fn no_cache_summary(&self) -> String {
        sorted_list(&self.no_cache_names)
    }

    /// Sorted revalidate extensions, for the startup banner
    #[must_use]
    pub fn revalidate_summary(&self) -> String {
        sorted_list(&self.revalidate_extensions)
    }
}

fn sorted_list(items: &[String]) -> String {
    let mut items: Vec<&str> = items.iter().map(String::as_str).collect();
    items.sort_unstable();
    items.join(", ")
}

/// Final path segment with any query string and fragment stripped.
fn basename(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    match path.rfind('/') {
        Some(i) => &path[i + 1..],
        None => path,
    }
}

/// Extension of a basename, including the leading dot.
///
/// Leading dots are not extension separators, so `.env` has no
/// extension while `app.min.js` has `.js`.
fn extension(name: &str) -> &str {
    let stem_start = name.len() - name.trim_start_matches('.').len();
    let rest = &name[stem_start..];
    match rest.rfind('.') {
        Some(i) => &name[stem_start + i..],
        None => "",
    }
}
