// API Server Binary Entry Point
//
// Purpose: Start the Axum server for the letters catalogue
// Usage: cargo run --bin api_server

use letters_catalogue::{create_router, AppConfig, AppState};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "letters_catalogue=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting letters server...");

    // Configuration from environment variables
    // Default: ./public (letters/manifest.json + letters/es/*.md)
    let config = AppConfig::from_env()?;

    tracing::info!("Configuration:");
    tracing::info!("  LETTERS_BASE: {}", config.base);
    tracing::info!("  LETTERS_LANG: {}", config.language);
    tracing::info!("  PORT: {}", config.port);
    tracing::info!("  CATALOGUE_TTL: {:?}", config.catalogue_ttl);

    let port = config.port;
    let state = AppState::new(config)?;

    // Warm the catalogue so the first visitor does not pay for the manifest fetch
    let catalogue = state.catalogue().await;
    tracing::info!("Catalogue ready: {} letters ({:?})", catalogue.len(), catalogue.origin);

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
