//! Fixtures shared by the unit tests of this crate.

use migration::{Migrator, MigratorTrait};
use model::entities::{account, account_type};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, DbErr, Set};

pub type Result<T> = std::result::Result<T, DbErr>;

/// Builds an account row without touching a database.
pub fn account_model(id: i32, code: &str, parent_id: Option<i32>, can_have_entries: bool) -> account::Model {
    account::Model {
        id,
        code: code.to_string(),
        name: format!("Account {}", code),
        description: None,
        can_have_entries,
        parent_id,
        account_type_id: 1,
        created_at: chrono::Utc::now(),
        updated_at: None,
    }
}

/// In-memory SQLite database with migrations applied.
pub async fn setup_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn new_account_type(db: &DatabaseConnection, name: &str) -> Result<account_type::Model> {
    account_type::ActiveModel {
        name: Set(name.to_string()),
        description: Set(None),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Inserts an account row directly, bypassing the guards.
pub async fn insert_account(
    db: &DatabaseConnection,
    code: &str,
    parent_id: Option<i32>,
    account_type_id: i32,
    can_have_entries: bool,
) -> Result<account::Model> {
    account::ActiveModel {
        code: Set(code.to_string()),
        name: Set(format!("Account {}", code)),
        description: Set(None),
        can_have_entries: Set(can_have_entries),
        parent_id: Set(parent_id),
        account_type_id: Set(account_type_id),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
}
