use std::sync::Arc;

use clap::Parser;

use pwa_server::config::{AppState, Args, ServeConfig};
use pwa_server::logger;
use pwa_server::server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = ServeConfig::resolve(&args)?;

    // Serve relative paths from the web app root
    std::env::set_current_dir(&config.root)?;

    let state = Arc::new(AppState::new(config));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(state))
}

async fn async_main(state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    // The marker file was validated before this point; binding is the
    // first externally visible side effect
    let listener = server::bind_listener(state.config.socket_addr())?;

    logger::log_server_start(&state.config, &state.rules);

    server::serve(listener, state).await;
    Ok(())
}
