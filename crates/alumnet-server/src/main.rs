//! Alumnet server — application entry point.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use alumnet_db::DbManager;
use alumnet_server::config::ServerConfig;
use alumnet_server::mailer::LogMailer;
use alumnet_server::{AppState, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("alumnet=info".parse().unwrap()),
        )
        .json()
        .init();

    let config = ServerConfig::from_env()?;

    tracing::info!(bind_addr = %config.bind_addr, "Starting Alumnet server...");

    let manager = DbManager::connect(&config.db).await?;
    alumnet_db::run_migrations(&manager.client()).await?;

    let state = AppState::new(manager.client(), &config, Arc::new(LogMailer));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Alumnet server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        })
        .await?;

    tracing::info!("Alumnet server stopped.");
    Ok(())
}
