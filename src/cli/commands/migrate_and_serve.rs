use anyhow::Result;
use tracing::{debug, error, info};

use super::serve::run_server;
use crate::config::{connect, run_migrations};
use crate::schemas::AppState;

pub async fn migrate_and_serve(database_url: &str, bind_address: &str) -> Result<()> {
    info!("Applying database migrations and starting server");
    debug!("Database URL: {}", database_url);

    let db = connect(database_url).await.inspect_err(|e| error!("{:#}", e))?;
    run_migrations(&db).await.inspect_err(|e| error!("{:#}", e))?;

    run_server(AppState::new(db), bind_address).await
}
