//! Guarded mutations of account types.

use chrono::Utc;
use model::entities::{account, account_type};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    sea_query::{Expr, Func},
};
use tracing::{info, instrument, warn};

use crate::error::{ChartError, Result};

#[derive(Debug, Clone, Default)]
pub struct NewAccountType {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AccountTypeChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Looks up a type by name ignoring case, skipping `except`.
async fn name_taken<C: ConnectionTrait>(conn: &C, name: &str, except: Option<i32>) -> Result<bool> {
    let mut query = account_type::Entity::find().filter(
        Expr::expr(Func::lower(Expr::col(account_type::Column::Name))).eq(name.to_lowercase()),
    );
    if let Some(id) = except {
        query = query.filter(account_type::Column::Id.ne(id));
    }
    Ok(query.count(conn).await? > 0)
}

#[instrument(skip(conn, input), fields(name = %input.name))]
pub async fn create_account_type<C: ConnectionTrait>(
    conn: &C,
    input: NewAccountType,
) -> Result<account_type::Model> {
    if name_taken(conn, &input.name, None).await? {
        warn!("Account type name {} already in use", input.name);
        return Err(ChartError::DuplicateName(input.name));
    }

    let created = account_type::ActiveModel {
        name: Set(input.name),
        description: Set(input.description),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    info!("Account type created with ID: {}", created.id);
    Ok(created)
}

#[instrument(skip(conn, changes))]
pub async fn update_account_type<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    changes: AccountTypeChanges,
) -> Result<account_type::Model> {
    let current = account_type::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(ChartError::not_found("Account type", id))?;

    if let Some(name) = &changes.name {
        if name_taken(conn, name, Some(id)).await? {
            warn!("Account type name {} already in use", name);
            return Err(ChartError::DuplicateName(name.clone()));
        }
    }

    let mut active: account_type::ActiveModel = current.into();
    if let Some(name) = changes.name {
        active.name = Set(name);
    }
    if let Some(description) = changes.description {
        active.description = Set(Some(description));
    }
    active.updated_at = Set(Some(Utc::now()));

    let updated = active.update(conn).await?;
    info!("Account type {} updated", id);
    Ok(updated)
}

/// Deletes a type no account refers to.
#[instrument(skip(conn))]
pub async fn delete_account_type<C: ConnectionTrait>(conn: &C, id: i32) -> Result<()> {
    if account_type::Entity::find_by_id(id).one(conn).await?.is_none() {
        return Err(ChartError::not_found("Account type", id));
    }

    let in_use = account::Entity::find()
        .filter(account::Column::AccountTypeId.eq(id))
        .count(conn)
        .await?;
    if in_use > 0 {
        warn!("Account type {} still used by {} accounts", id, in_use);
        return Err(ChartError::InUse(id));
    }

    account_type::Entity::delete_by_id(id).exec(conn).await?;
    info!("Account type {} deleted", id);
    Ok(())
}
