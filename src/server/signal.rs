// Signal handling module
//
// SIGINT (Ctrl+C) and SIGTERM both stop the server. There is no reload
// or upgrade path; the process is meant to be restarted by hand.

use std::sync::Arc;
use tokio::sync::Notify;

/// Spawn the interrupt listener and return the notify it triggers.
///
/// Must be called from inside the runtime.
#[cfg(unix)]
pub fn shutdown_notify() -> Arc<Notify> {
    use tokio::signal::unix::{signal, SignalKind};

    let notify = Arc::new(Notify::new());
    let trigger = Arc::clone(&notify);
    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
        trigger.notify_waiters();
    });
    notify
}

/// Windows fallback: only Ctrl+C is supported
#[cfg(not(unix))]
pub fn shutdown_notify() -> Arc<Notify> {
    let notify = Arc::new(Notify::new());
    let trigger = Arc::clone(&notify);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.notify_waiters();
        }
    });
    notify
}
