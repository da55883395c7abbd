// Connection handling module
// Serves each accepted TCP connection over HTTP/1.1 on its own task

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;

use crate::config::AppState;
use crate::handler;

/// Serve one accepted connection on a spawned task.
///
/// Keep-alive stays on so a page load's burst of asset requests shares
/// one connection.
pub fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) {
    let logger = state.logger.clone();
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let conn = http1::Builder::new().keep_alive(true).serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&state);
                async move { handler::handle_request(req, peer_addr, state).await }
            }),
        );

        if let Err(err) = conn.await {
            logger.log_error(&format!(
                "Failed to serve connection from {peer_addr}: {err:?}"
            ));
        }
    });
}
