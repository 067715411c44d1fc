pub mod catalog;
pub mod config;
pub mod errors;
pub mod models;
pub mod render;
pub mod routes;

use std::sync::Arc;

use crate::catalog::CatalogClient;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::routes::AppState;

/// Builds the catalog client and the router, binds the listener and serves
/// until ctrl-c / SIGTERM.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let catalog = Arc::new(CatalogClient::new(&config)?);
    let state = AppState {
        catalog,
        search_limit: config.search_limit,
    };
    let app = routes::router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(AppError::from)?;
    log::info!(
        "Serving the {} catalog front-end on http://{}",
        config.api_base_url,
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => log::warn!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("Received ctrl-c, shutting down"),
        _ = terminate => log::info!("Received SIGTERM, shutting down"),
    }
}
