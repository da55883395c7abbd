// Server loop module
// Accept loop with interrupt-driven shutdown

use std::sync::Arc;

use tokio::net::TcpListener;

use super::connection::handle_connection;
use super::signal::shutdown_notify;
use crate::config::AppState;
use crate::logger;

/// Run the accept loop until an interrupt arrives.
///
/// The listening socket closes when it is dropped on return; requests
/// already in flight finish on their own tasks without any draining
/// guarantee.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) {
    let shutdown = shutdown_notify();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        handle_connection(stream, peer_addr, Arc::clone(&state));
                    }
                    Err(e) => {
                        state.logger.log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                logger::log_server_stop();
                break;
            }
        }
    }

    drop(listener);
}
