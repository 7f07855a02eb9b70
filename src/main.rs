use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn};

use storefront_rs::{
    create_app, init_observability,
    observability::Metrics,
    repositories::{
        spawn_expired_session_cleanup, ExpiringMemoryStore, InMemoryProductCatalog, ProductCatalog,
    },
    shutdown_observability, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first (basic logging only)
    let config = Config::from_environment().context("Failed to load configuration")?;
    println!("Configuration loaded successfully");

    init_observability(&config.observability).context("Failed to initialize observability")?;

    info!(
        "Starting {} v{}",
        config.observability.service_name, config.observability.service_version
    );

    let metrics = Arc::new(Metrics::new().context("Failed to initialize metrics")?);
    info!("Metrics initialized successfully");

    let catalog = if config.catalog.seed_demo_products {
        InMemoryProductCatalog::demo()
    } else {
        warn!("Starting with an empty product catalog");
        InMemoryProductCatalog::new()
    };
    info!(products = catalog.count().await?, "Product catalog ready");

    let sessions = ExpiringMemoryStore::new();
    let session_cleanup =
        spawn_expired_session_cleanup(sessions.clone(), config.session.cleanup_interval());
    info!(
        "Expired sessions swept every {}s",
        config.session.cleanup_interval_seconds
    );

    let app = create_app(&config, Arc::new(catalog), sessions, metrics);

    let addr = SocketAddr::new(
        config
            .server
            .host
            .parse()
            .with_context(|| format!("Invalid listen host: {}", config.server.host))?,
        config.server.port,
    );

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    session_cleanup.abort();
    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
    shutdown_observability().await;
}
