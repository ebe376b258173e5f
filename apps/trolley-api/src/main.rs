//! # Trolley API Server
//!
//! ## Startup
//! ```text
//! .env ─► ApiConfig ─► PricingResolver ─► BasketStore ─► [BasketSweeper]
//!                                              │
//!                                              ▼
//!                                      axum::serve (graceful shutdown)
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info, warn};
use trolley_api::{build_router, init_tracing, ApiConfig, AppState};
use trolley_store::{BasketStore, BasketSweeper};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is normal outside development.
    let dotenv = dotenvy::dotenv();

    init_tracing();

    if let Err(e) = &dotenv {
        if !e.not_found() {
            warn!(error = %e, "Failed to read .env file");
        }
    }

    info!("Starting Trolley API server...");

    // Load configuration
    let config = ApiConfig::load()?;
    let addr = config.socket_addr()?;
    info!(
        %addr,
        expiry_ms = config.expiry_window.as_millis() as u64,
        sweep_ms = config.sweep_interval.map(|d| d.as_millis() as u64),
        rate_limit = config.rate_limit,
        catalog = config.price_catalog_path.as_deref(),
        "Configuration loaded"
    );

    // Build the store
    let pricing = config.pricing()?;
    let store = Arc::new(BasketStore::new(config.store_config(), pricing));

    let sweeper = config
        .sweep_interval
        .map(|every| BasketSweeper::spawn(store.clone(), every));

    // Build the router
    let state = AppState::new(store, &config.api_key, config.rate_limit_config());
    let app = build_router(state);

    // Bind and serve
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    if let Some(sweeper) = sweeper {
        if let Err(e) = sweeper.shutdown().await {
            error!(error = %e, "Basket sweeper did not stop cleanly");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
