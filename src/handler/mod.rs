//! Request handling module
//!
//! Per-request entry point. File transfer is delegated to the static
//! file layer; this module gates the method, extracts the conditional
//! and range headers, and runs the cache-override policy against every
//! outgoing response before hyper writes its head.

pub mod static_files;

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, Version};

use crate::config::AppState;
use crate::http;
use crate::logger::{AccessLogEntry, Logger};

/// Request context for the static file layer
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
    pub range_header: Option<String>,
    pub logger: &'a Logger,
}

/// Main entry point for HTTP request handling.
///
/// The policy runs on the response of every request whatever its
/// status, so even a 404 for `/sw.js` carries the no-cache headers and
/// cannot park a stale negative result in a cache along the way.
///
/// Generic over the body type because no request body is ever read;
/// tests drive it with `Request<()>`.
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let path = req.uri().path();
    let is_head = *method == Method::HEAD;

    let mut response = if *method == Method::GET || is_head {
        let ctx = RequestContext {
            path,
            is_head,
            if_none_match: header_string(&req, "if-none-match"),
            if_modified_since: header_string(&req, "if-modified-since"),
            range_header: header_string(&req, "range"),
            logger: &state.logger,
        };
        static_files::serve(&ctx, &state.config.root).await
    } else if *method == Method::OPTIONS {
        http::build_options_response()
    } else {
        state
            .logger
            .log_warning(&format!("Method not allowed: {method}"));
        http::build_405_response()
    };

    // Inject policy headers right before the response head goes out
    state.rules.apply(path, response.headers_mut());

    log_request(&req, peer_addr, &response, &state.logger);

    Ok(response)
}

/// Emit the access log line for a finished response
fn log_request<B>(
    req: &Request<B>,
    peer_addr: SocketAddr,
    response: &Response<Full<Bytes>>,
    logger: &Logger,
) {
    let status = response.status().as_u16();
    if !logger.should_log(status) {
        return;
    }

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = status;
    entry.body_bytes = content_length(response);
    entry.referer = header_string(req, "referer");
    entry.user_agent = header_string(req, "user-agent");
    logger.log_access(&entry);
}

fn header_string<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn content_length(response: &Response<Full<Bytes>>) -> usize {
    response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServeConfig;

    fn test_state(tag: &str) -> Arc<AppState> {
        let root = std::env::temp_dir().join(format!("pwa-server-handler-{}-{tag}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("sw.js"), b"// worker").unwrap();
        std::fs::write(root.join("app.js"), b"console.log(1)").unwrap();
        std::fs::write(root.join("logo.png"), b"\x89PNG").unwrap();
        Arc::new(AppState::new(ServeConfig {
            root: root.canonicalize().unwrap(),
            port: 8080,
            verbose: false,
        }))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    fn get(path: &str) -> Request<()> {
        Request::builder().uri(path).body(()).unwrap()
    }

    #[tokio::test]
    async fn service_worker_gets_bypass_headers() {
        let state = test_state("sw");
        let resp = handle_request(get("/sw.js"), peer(), state).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Cache-Control").unwrap(),
            "no-cache, no-store, must-revalidate"
        );
        assert_eq!(resp.headers().get("Pragma").unwrap(), "no-cache");
        assert_eq!(resp.headers().get("Expires").unwrap(), "0");
    }

    #[tokio::test]
    async fn script_gets_revalidate_header() {
        let state = test_state("script");
        let resp = handle_request(get("/app.js?v=3"), peer(), state).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("Cache-Control").unwrap(), "no-cache");
        assert!(!resp.headers().contains_key("Pragma"));
    }

    #[tokio::test]
    async fn image_keeps_default_headers() {
        let state = test_state("image");
        let resp = handle_request(get("/logo.png"), peer(), state).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert!(!resp.headers().contains_key("Cache-Control"));
    }

    #[tokio::test]
    async fn policy_applies_to_404_too() {
        let state = test_state("missing");
        let resp = handle_request(get("/gone.js"), peer(), state).await.unwrap();
        assert_eq!(resp.status(), 404);
        assert_eq!(resp.headers().get("Cache-Control").unwrap(), "no-cache");
    }

    #[tokio::test]
    async fn head_is_served_like_get_without_body() {
        let state = test_state("head");
        let req = Request::builder()
            .method(Method::HEAD)
            .uri("/sw.js")
            .body(())
            .unwrap();
        let resp = handle_request(req, peer(), state).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("Content-Length").unwrap(), "9");
        assert_eq!(
            resp.headers().get("Cache-Control").unwrap(),
            "no-cache, no-store, must-revalidate"
        );
    }

    #[tokio::test]
    async fn post_is_rejected() {
        let state = test_state("post");
        let req = Request::builder()
            .method(Method::POST)
            .uri("/sw.js")
            .body(())
            .unwrap();
        let resp = handle_request(req, peer(), state).await.unwrap();
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers().get("Allow").unwrap(), "GET, HEAD, OPTIONS");
    }

    #[tokio::test]
    async fn options_is_answered() {
        let state = test_state("options");
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/")
            .body(())
            .unwrap();
        let resp = handle_request(req, peer(), state).await.unwrap();
        assert_eq!(resp.status(), 204);
    }

    #[test]
    fn version_labels() {
        assert_eq!(version_label(Version::HTTP_10), "1.0");
        assert_eq!(version_label(Version::HTTP_11), "1.1");
        assert_eq!(version_label(Version::HTTP_2), "2");
    }

}
