use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace};

use crate::config::initialize_app_state_with_url;
use crate::router::create_router;
use crate::schemas::AppState;

pub async fn serve(database_url: &str, bind_address: &str) -> Result<()> {
    trace!("Entering serve function");
    info!("Chart of accounts service starting up");
    debug!("Database URL: {}", database_url);

    let state = initialize_app_state_with_url(database_url)
        .await
        .inspect_err(|e| error!("Failed to initialize application state: {:#}", e))?;

    run_server(state, bind_address).await
}

/// Binds `bind_address` and serves the API until the server stops.
pub async fn run_server(state: AppState, bind_address: &str) -> Result<()> {
    let app = create_router(state);
    debug!("Router created successfully");

    info!("Starting server on {}", bind_address);
    let listener = TcpListener::bind(bind_address)
        .await
        .inspect_err(|e| error!("Failed to bind to address {}: {}", bind_address, e))?;

    info!("API server running on http://{}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown gracefully");
    Ok(())
}
