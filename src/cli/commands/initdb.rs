use anyhow::Result;
use tracing::{error, info, trace};

use crate::config::{connect, run_migrations};

pub async fn init_database(database_url: &str) -> Result<()> {
    trace!("Entering init_database function");
    info!("Initializing database");

    let db = connect(database_url).await.inspect_err(|e| error!("{:#}", e))?;
    run_migrations(&db).await.inspect_err(|e| error!("{:#}", e))?;

    info!("Database initialization completed successfully!");
    Ok(())
}
