// API Server Binary Entry Point
//
// Purpose: Start the Axum API server over a results export
// Usage: cargo run --features api --bin api_server

use race_results_rust::{AppConfig, AppState, create_router};
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
                    "race_results_rust=info,api_server=info,tower_http=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    let config = AppConfig::from_env()?;
    tracing::info!("Configuration:");
    tracing::info!("  RESULTS_PATH: {}", config.results_path);
    tracing::info!("  PORT: {}", config.port);
    tracing::info!("  DEFAULT_DISTANCE: {}", config.default_distance);
    tracing::info!("  PERCENTILE_KIND: {:?}", config.percentile_kind);

    // Loads and normalizes the results once; aborts on schema errors
    let port = config.port;
    let state = AppState::new(config)?;
    tracing::info!("Loaded {} finishers", state.table.len());

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
