use anyhow::Result;
use std::net::SocketAddr;
use tracing::info;

use rewards_api_server::config::Settings;
use rewards_api_server::session::{sweeper, SESSION_TTL, SWEEP_INTERVAL};
use rewards_api_server::state::AppState;
use rewards_api_server::{build_router, cors_layer};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,rewards_api_server=debug".to_string()),
        )
        .with_target(true)
        .init();

    info!("🚀 Starting rewards API server...");

    let settings = Settings::load()?;
    info!("✅ Configuration loaded");

    let state = AppState::new(settings.clone());
    info!("✅ Session registry ready (catalog: {:?})", settings.catalog.path);

    // Periodic expiry sweep, owned by the process and stopped at shutdown.
    let sweep_task = sweeper::spawn_sweeper(state.registry.clone(), SWEEP_INTERVAL, SESSION_TTL);

    let cors = cors_layer(&settings.cors.allowed_origin)?;
    let app = build_router(state, cors);

    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));
    info!("🎯 Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweep_task.abort();
    info!("👋 Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
    }
}
