use std::path::Path;

use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tracing::{debug, info};

use crate::schemas::AppState;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://chartrust.db";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Adds `mode=rwc` to file-backed SQLite URLs so a missing database file is
/// created, and makes sure its directory exists.
fn prepare_sqlite_url(database_url: &str) -> Result<String> {
    let Some(rest) = database_url.strip_prefix("sqlite://") else {
        return Ok(database_url.to_string());
    };
    if rest.starts_with(":memory:") || rest.contains("mode=") {
        return Ok(database_url.to_string());
    }

    let path = rest.split('?').next().unwrap_or(rest);
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory {}", parent.display()))?;
    }

    let separator = if rest.contains('?') { '&' } else { '?' };
    Ok(format!("{}{}mode=rwc", database_url, separator))
}

/// Opens a connection to `database_url`.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    let url = prepare_sqlite_url(database_url)?;
    info!("Connecting to database: {}", database_url);
    let db = Database::connect(&url)
        .await
        .with_context(|| format!("Failed to connect to database '{}'", database_url))?;
    debug!("Database connection established");
    Ok(db)
}

/// Applies all pending migrations.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    info!("Running database migrations");
    Migrator::up(db, None)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations completed successfully");
    Ok(())
}

/// Initialize application state for the given database URL
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    let db = connect(database_url).await?;
    Ok(AppState::new(db))
}
