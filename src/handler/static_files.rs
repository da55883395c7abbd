//! Static file serving module
//!
//! Resolves request paths against the serve root and builds file
//! responses with conditional request and byte-range support.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::fs;

use crate::handler::RequestContext;
use crate::http::{self, cache, mime, response, RangeOutcome};
use crate::logger::Logger;

/// Index files tried when the request path names a directory
const INDEX_FILES: &[&str] = &["index.html", "index.htm"];

/// Serve one file from the root directory, or 404.
pub async fn serve(ctx: &RequestContext<'_>, root: &Path) -> Response<Full<Bytes>> {
    match load(ctx, root).await {
        Some(file) => build_response(ctx, &file),
        None => http::build_404_response(),
    }
}

/// A loaded file plus the metadata the response builders need
struct LoadedFile {
    content: Vec<u8>,
    content_type: &'static str,
    modified: Option<SystemTime>,
}

async fn load(ctx: &RequestContext<'_>, root: &Path) -> Option<LoadedFile> {
    let file_path = resolve_path(ctx.path, root, ctx.logger)?;

    let metadata = fs::metadata(&file_path).await.ok()?;
    if !metadata.is_file() {
        return None;
    }
    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            ctx.logger
                .log_error(&format!("Failed to read file '{}': {e}", file_path.display()));
            return None;
        }
    };
    let content_type = mime::content_type(file_path.extension().and_then(|e| e.to_str()));

    Some(LoadedFile {
        content,
        content_type,
        modified: metadata.modified().ok(),
    })
}

/// Resolve a request path to a file inside the serve root.
///
/// Directory requests fall back to index files. The canonicalized
/// result must stay inside the canonicalized root; anything else is
/// treated as not found.
fn resolve_path(path: &str, root: &Path, logger: &Logger) -> Option<PathBuf> {
    // Remove leading slash and defang traversal segments
    let clean_path = path.trim_start_matches('/').replace("..", "");
    let mut file_path = root.join(&clean_path);

    let root_canonical = match root.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger.log_warning(&format!(
                "Serve root not found or inaccessible '{}': {e}",
                root.display()
            ));
            return None;
        }
    };

    if file_path.is_dir() || clean_path.is_empty() || clean_path.ends_with('/') {
        for index_file in INDEX_FILES {
            let index_path = file_path.join(index_file);
            if index_path.is_file() {
                file_path = index_path;
                break;
            }
        }
    }

    // A missing file is an ordinary 404, not worth a log line here
    let file_path = file_path.canonicalize().ok()?;
    if file_path.starts_with(&root_canonical) {
        Some(file_path)
    } else {
        logger.log_warning(&format!(
            "Path traversal attempt blocked: {path} -> {}",
            file_path.display()
        ));
        None
    }
}

/// Build the response for a loaded file: 304 for fresh client copies,
/// 206/416 for range requests, 200 otherwise.
fn build_response(ctx: &RequestContext<'_>, file: &LoadedFile) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&file.content);
    let last_modified = file.modified.map(cache::http_date);
    let total_size = file.content.len();

    if cache::etag_matches(ctx.if_none_match.as_deref(), &etag) {
        return response::build_304_response(&etag, last_modified.as_deref());
    }
    // If-None-Match takes precedence; fall back to the date check only
    // when the client sent no entity tag
    if ctx.if_none_match.is_none() {
        if let Some(mtime) = file.modified {
            if cache::unmodified_since(ctx.if_modified_since.as_deref(), mtime) {
                return response::build_304_response(&etag, last_modified.as_deref());
            }
        }
    }

    match http::parse_range(ctx.range_header.as_deref(), total_size) {
        RangeOutcome::Satisfiable(range) => {
            let body = Bytes::from(file.content[range.start..=range.end].to_vec());
            response::build_partial_response(
                body,
                file.content_type,
                &etag,
                last_modified.as_deref(),
                range,
                total_size,
                ctx.is_head,
            )
        }
        RangeOutcome::Unsatisfiable => http::build_416_response(total_size),
        RangeOutcome::Ignored => response::build_file_response(
            Bytes::from(file.content.clone()),
            file.content_type,
            &etag,
            last_modified.as_deref(),
            ctx.is_head,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_root(tag: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("pwa-server-static-{}-{tag}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("assets")).unwrap();
        std::fs::write(dir.join("sw.js"), b"// worker").unwrap();
        std::fs::write(dir.join("index.html"), b"<html>home</html>").unwrap();
        std::fs::write(dir.join("assets/app.css"), b"body { margin: 0 }").unwrap();
        dir
    }

    fn test_ctx<'a>(path: &'a str, logger: &'a Logger) -> RequestContext<'a> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
            if_modified_since: None,
            range_header: None,
            logger,
        }
    }

    #[tokio::test]
    async fn serves_file_with_validators() {
        let root = test_root("basic");
        let logger = Logger::new(false);
        let resp = serve(&test_ctx("/assets/app.css", &logger), &root).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("Content-Type").unwrap(), "text/css");
        assert!(resp.headers().contains_key("ETag"));
        assert!(resp.headers().contains_key("Last-Modified"));
        assert!(!resp.headers().contains_key("Cache-Control"));
    }

    #[tokio::test]
    async fn root_falls_back_to_index() {
        let root = test_root("index");
        let logger = Logger::new(false);
        let resp = serve(&test_ctx("/", &logger), &root).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "text/html; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn missing_file_is_404() {
        let root = test_root("missing");
        let logger = Logger::new(false);
        let resp = serve(&test_ctx("/nope.png", &logger), &root).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn traversal_is_blocked() {
        let root = test_root("traversal");
        let logger = Logger::new(false);
        let resp = serve(&test_ctx("/../../etc/passwd", &logger), &root).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn matching_etag_returns_304() {
        let root = test_root("etag");
        let logger = Logger::new(false);
        let first = serve(&test_ctx("/sw.js", &logger), &root).await;
        let etag = first.headers().get("ETag").unwrap().to_str().unwrap().to_string();

        let mut ctx = test_ctx("/sw.js", &logger);
        ctx.if_none_match = Some(etag.clone());
        let second = serve(&ctx, &root).await;
        assert_eq!(second.status(), 304);
        assert_eq!(second.headers().get("ETag").unwrap().to_str().unwrap(), etag);
    }

    #[tokio::test]
    async fn fresh_if_modified_since_returns_304() {
        let root = test_root("ims");
        let logger = Logger::new(false);
        let first = serve(&test_ctx("/sw.js", &logger), &root).await;
        let stamp = first
            .headers()
            .get("Last-Modified")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();

        let mut ctx = test_ctx("/sw.js", &logger);
        ctx.if_modified_since = Some(stamp);
        let second = serve(&ctx, &root).await;
        assert_eq!(second.status(), 304);
    }

    #[tokio::test]
    async fn range_request_gets_partial_content() {
        let root = test_root("range");
        let logger = Logger::new(false);
        let mut ctx = test_ctx("/sw.js", &logger);
        ctx.range_header = Some("bytes=0-3".to_string());
        let resp = serve(&ctx, &root).await;
        assert_eq!(resp.status(), 206);
        assert_eq!(resp.headers().get("Content-Range").unwrap(), "bytes 0-3/9");
        assert_eq!(resp.headers().get("Content-Length").unwrap(), "4");
    }

    #[tokio::test]
    async fn out_of_bounds_range_gets_416() {
        let root = test_root("range416");
        let logger = Logger::new(false);
        let mut ctx = test_ctx("/sw.js", &logger);
        ctx.range_header = Some("bytes=500-".to_string());
        let resp = serve(&ctx, &root).await;
        assert_eq!(resp.status(), 416);
    }
}
