use anyhow::Context;
use perk_service::{build_router, config, infrastructure};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::load_config().context("failed to load configuration")?;

    // 初始化日志
    infrastructure::logger::Logger::init(&config.logging.level);

    info!("Starting perk service...");

    let store = infrastructure::build_store(&config.storage, &config.database)
        .await
        .map_err(|e| {
            error!("Failed to initialize storage: {:#}", e);
            e
        })?;

    let app = build_router(store.clone());

    let listener = TcpListener::bind(config.socket_addr()?).await?;
    let addr = listener.local_addr()?;

    info!("🚀 Perk service running on http://{}", addr);
    info!(storage = store.backend_name(), "📊 Available endpoints:");
    info!("   GET    /health           - Health check");
    info!("   GET    /perks            - List perks (newest first)");
    info!("   GET    /perks?title=...  - Filter perks by exact title");
    info!("   POST   /perks            - Create perk");
    info!("   GET    /perks/:id        - Get perk by ID");
    info!("   PATCH  /perks/:id        - Update perk");
    info!("   DELETE /perks/:id        - Delete perk");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Perk service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
