use std::net::SocketAddr;

use tokio::net::TcpListener;
use todo_server::{build_store, config::Config, create_app, init_tracing, run, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config.log_level);

    tracing::info!(
        store = %config.store,
        delete_mode = %config.delete_mode,
        validate_first = config.validate_first,
        expose_get_by_id = config.expose_get_by_id,
        "Starting todo server"
    );

    let store = build_store(&config).await?;
    let state = AppState::new(store, config.handler_options());
    let app = create_app(state, &config)?;

    let addr: SocketAddr = config.server_addr().parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    run(listener, app, shutdown_signal()).await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
