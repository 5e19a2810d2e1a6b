use anyhow::Result;
use tracing::info;
use tutorial_hub::{create_router_with_config, init_tracing, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    // A missing .env file is fine; the environment may be set directly.
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let app = create_router_with_config(&config).await?;

    let endpoint = &config.server.bind_addr;
    info!("Starting at endpoint:{}", endpoint);
    info!("Starting Tutorial Hub server v{}...", env!("CARGO_PKG_VERSION"));

    let listener = tokio::net::TcpListener::bind(endpoint).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    // ---
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
    }
    info!("Shutdown signal received");
}
