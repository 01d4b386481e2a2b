//! Quote API HTTP server binary

use quotes_core::open_store;
use quotes_server::{app, AppState, ServerConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;

    // Initialize logging, with OpenTelemetry export when enabled
    if config.otel_enabled {
        quotes_server::tracing::init_tracing_stack("quotes-server")?;
        info!("OpenTelemetry tracing enabled");
    } else {
        quotes_server::tracing::init_console_logging()?;
        info!("Console logging enabled (set OTEL_ENABLED=true for OpenTelemetry)");
    }

    info!("Starting Quote API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Prometheus metrics
    quotes_server::metrics::init_prometheus()?;
    quotes_server::metrics::init_metrics();

    // Open the record store
    let store_config = config.store_config();
    info!("Using {:?} store", store_config);
    let store = open_store(store_config).await?;
    quotes_server::metrics::update_quote_count(store.count().await?);

    // Build the application
    let state = AppState::new(store);
    let app = app(state, &config.api_prefix);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Quote API listening on {}", listener.local_addr()?);

    // Set up shutdown signal handler
    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install CTRL+C signal handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal, shutting down gracefully...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    // Cleanup OpenTelemetry on shutdown
    if config.otel_enabled {
        info!("Flushing OpenTelemetry traces...");
        quotes_server::tracing::shutdown_telemetry();
    }

    info!("Server shutdown complete");
    Ok(())
}
