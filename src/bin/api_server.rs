// src/bin/api_server.rs

use order_catalogue::infra::{config::Config, telemetry};
use order_catalogue::transport;
use order_catalogue::CatalogueService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    telemetry::init_tracing()?;

    // --- Store Initialization (once per process) ---
    tracing::info!(backend = ?config.store_backend, "initializing catalogue store");
    let service = CatalogueService::connect(&config).await?;
    tracing::info!("catalogue store ready (customers, products, orders)");

    let app_state = transport::http::AppState::new(service);

    // --- API Server Initialization ---
    let app = transport::http::create_app(app_state, &config.api_base_path);
    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(
        "API server listening on http://{} (resources under `{}`)",
        local_addr,
        if config.api_base_path.is_empty() { "/" } else { config.api_base_path.as_str() }
    );
    tracing::info!(
        "Swagger UI available at http://localhost:{}{}",
        local_addr.port(),
        transport::http::router::DOCS_PATH
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
            tracing::info!("shutdown signal received");
        })
        .await?;

    tracing::info!("graceful shutdown complete");
    Ok(())
}
