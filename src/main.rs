use anyhow::Context;
use tokio::net::TcpListener;

use stockviz::app;
use stockviz::config::DashboardConfig;
use stockviz::logging::{init_logging, LoggingConfig};
use stockviz::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = DashboardConfig::from_env().map_err(anyhow::Error::msg)?;

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env(config.debug))
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let addr = config.bind_addr();
    let state = AppState::from_config(config).map_err(anyhow::Error::msg)?;
    let app = app::create_app(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("🚀 stockviz dashboard running at http://{}/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
