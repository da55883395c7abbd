//! Static file server for a progressive web app.
//!
//! Serves the app's assets from disk while overriding browser caching
//! for the files whose staleness breaks the app's own update path: the
//! service worker script and the manifest are always fetched fresh, and
//! scripts, styles, and markup revalidate on every request. File
//! transfer itself (conditional requests, byte ranges, MIME typing) is
//! handled by the static file layer underneath the policy.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
