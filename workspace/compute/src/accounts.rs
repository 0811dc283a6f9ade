//! Guarded create/update/delete of accounts.
//!
//! Each operation reads one snapshot of the tree through the connection it is
//! given, runs every check against that snapshot and only then writes. Callers
//! pass a `DatabaseTransaction` and hold the mutation lock so the check and the
//! write are atomic.

use chrono::Utc;
use model::entities::{account, account_type};
use model::Code;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
    sea_query::Expr,
};
use tracing::{debug, info, instrument, trace, warn};

use crate::allocator::{next_child_code, next_root_number};
use crate::error::{ChartError, Result};
use crate::tree::AccountTree;

/// Input for [`create_account`].
#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    /// Explicit code; allocated automatically when `None`.
    pub code: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub can_have_entries: bool,
    pub parent_id: Option<i32>,
    /// Required for root accounts; must match the parent's type otherwise.
    pub account_type_id: Option<i32>,
}

/// Input for [`update_account`]. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub can_have_entries: Option<bool>,
    pub account_type_id: Option<i32>,
    pub parent_id: Option<i32>,
}

async fn account_type_exists<C: ConnectionTrait>(conn: &C, id: i32) -> Result<bool> {
    Ok(account_type::Entity::find_by_id(id).one(conn).await?.is_some())
}

/// Creates an account after checking parent, type and code uniqueness.
#[instrument(skip(conn, input), fields(parent_id = ?input.parent_id, code = ?input.code))]
pub async fn create_account<C: ConnectionTrait>(conn: &C, input: NewAccount) -> Result<account::Model> {
    trace!("Entering create_account");
    let tree = AccountTree::load(conn).await?;

    let parent = match input.parent_id {
        Some(parent_id) => {
            let parent = tree.get(parent_id).ok_or_else(|| {
                warn!("Parent account {} not found", parent_id);
                ChartError::InvalidParent(format!("Parent account with ID {} not found", parent_id))
            })?;
            if let Some(requested) = input.account_type_id {
                if requested != parent.account_type_id {
                    warn!(
                        "Requested type {} differs from parent type {}",
                        requested, parent.account_type_id
                    );
                    return Err(ChartError::TypeMismatch {
                        requested,
                        parent: parent.account_type_id,
                    });
                }
            }
            Some(parent)
        }
        None => None,
    };

    let account_type_id = match parent {
        Some(parent) => parent.account_type_id,
        None => {
            let type_id = input.account_type_id.ok_or_else(|| {
                ChartError::InvalidAccountType("A root account requires an account type".to_string())
            })?;
            if !account_type_exists(conn, type_id).await? {
                warn!("Account type {} not found", type_id);
                return Err(ChartError::InvalidAccountType(format!(
                    "Account type with ID {} not found",
                    type_id
                )));
            }
            type_id
        }
    };

    let code = match (&input.code, parent) {
        (Some(raw), _) => Code::parse(raw)?,
        (None, Some(parent)) => next_child_code(&tree, parent)?,
        (None, None) => Code::parse(&next_root_number(&tree)?.to_string())?,
    };
    debug!("Creating account with code {} and type {}", code, account_type_id);

    if tree.code_taken(&code, None) {
        warn!("Code {} already in use", code);
        return Err(ChartError::DuplicateCode(code.into()));
    }

    let created = account::ActiveModel {
        code: Set(code.into()),
        name: Set(input.name),
        description: Set(input.description),
        can_have_entries: Set(input.can_have_entries),
        parent_id: Set(input.parent_id),
        account_type_id: Set(account_type_id),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    info!("Account created with ID: {}, code: {}", created.id, created.code);
    Ok(created)
}

/// Applies `changes` to account `id`.
///
/// All supplied fields are validated before anything is written; the first
/// failing rule aborts the whole update.
#[instrument(skip(conn, changes))]
pub async fn update_account<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    changes: AccountChanges,
) -> Result<account::Model> {
    trace!("Entering update_account for {}", id);
    let tree = AccountTree::load(conn).await?;
    let current = tree
        .get(id)
        .cloned()
        .ok_or(ChartError::not_found("Account", id))?;
    let frozen = tree.is_leaf_frozen(id);

    let new_code = match &changes.code {
        Some(raw) => {
            let code = Code::parse(raw)?;
            if code.as_str() == current.code {
                None
            } else {
                if current.parent_id.is_some() {
                    warn!("Refusing code change on child account {}", id);
                    return Err(ChartError::CodeImmutableUnderParent(id));
                }
                if frozen {
                    warn!("Refusing code change on frozen account {}", id);
                    return Err(ChartError::CodeImmutableWithChildren(id));
                }
                if tree.code_taken(&code, Some(id)) {
                    warn!("Code {} already in use", code);
                    return Err(ChartError::DuplicateCode(code.into()));
                }
                Some(code)
            }
        }
        None => None,
    };

    let new_type = match changes.account_type_id {
        Some(type_id) if type_id != current.account_type_id => {
            if current.parent_id.is_some() {
                warn!("Refusing type change on child account {}", id);
                return Err(ChartError::TypeImmutableUnderParent(id));
            }
            if frozen {
                warn!("Refusing type change on frozen account {}", id);
                return Err(ChartError::TypeImmutableWithChildren(id));
            }
            if !account_type_exists(conn, type_id).await? {
                return Err(ChartError::InvalidAccountType(format!(
                    "Account type with ID {} not found",
                    type_id
                )));
            }
            Some(type_id)
        }
        _ => None,
    };

    let new_parent = match changes.parent_id {
        Some(parent_id) if Some(parent_id) != current.parent_id => {
            if frozen {
                warn!("Refusing parent change on frozen account {}", id);
                return Err(ChartError::ParentImmutableWithEntries(id));
            }
            let parent = tree.get(parent_id).ok_or_else(|| {
                ChartError::InvalidParent(format!("Parent account with ID {} not found", parent_id))
            })?;
            if tree.subtree(id).contains(&parent_id) {
                return Err(ChartError::InvalidParent(format!(
                    "Account {} can't be moved under itself or its descendant {}",
                    id, parent_id
                )));
            }
            if let Some(requested) = changes.account_type_id {
                if requested != parent.account_type_id {
                    return Err(ChartError::TypeMismatch {
                        requested,
                        parent: parent.account_type_id,
                    });
                }
            }
            Some(parent)
        }
        _ => None,
    };

    // A moved subtree inherits its new parent's type.
    let effective_type = new_parent.map(|p| p.account_type_id).or(new_type);

    let mut active: account::ActiveModel = current.clone().into();
    let mut updated_fields = Vec::new();

    if let Some(code) = new_code {
        updated_fields.push(format!("code: {}", code));
        active.code = Set(code.into());
    }
    if let Some(name) = changes.name {
        updated_fields.push(format!("name: {}", name));
        active.name = Set(name);
    }
    if let Some(description) = changes.description {
        updated_fields.push("description".to_string());
        active.description = Set(Some(description));
    }
    if let Some(can_have_entries) = changes.can_have_entries {
        updated_fields.push(format!("can_have_entries: {}", can_have_entries));
        active.can_have_entries = Set(can_have_entries);
    }
    if let Some(parent) = new_parent {
        updated_fields.push(format!("parent_id: {}", parent.id));
        active.parent_id = Set(Some(parent.id));
    }
    if let Some(type_id) = effective_type {
        if type_id != current.account_type_id {
            updated_fields.push(format!("account_type_id: {}", type_id));
            active.account_type_id = Set(type_id);
        }
    }
    active.updated_at = Set(Some(Utc::now()));

    let updated = active.update(conn).await?;

    if updated.account_type_id != current.account_type_id {
        let descendants: Vec<i32> = tree.subtree(id).into_iter().skip(1).collect();
        if !descendants.is_empty() {
            debug!(
                "Propagating account type {} to {} descendants",
                updated.account_type_id,
                descendants.len()
            );
            account::Entity::update_many()
                .col_expr(account::Column::AccountTypeId, Expr::value(updated.account_type_id))
                .filter(account::Column::Id.is_in(descendants))
                .exec(conn)
                .await?;
        }
    }

    info!(
        "Account {} updated. Updated fields: {}",
        id,
        if updated_fields.is_empty() { "none".to_string() } else { updated_fields.join(", ") }
    );
    Ok(updated)
}

/// Deletes account `id` together with its subtree.
///
/// Refused when the account, or any account below it, is leaf-frozen.
#[instrument(skip(conn))]
pub async fn delete_account<C: ConnectionTrait>(conn: &C, id: i32) -> Result<u64> {
    trace!("Entering delete_account for {}", id);
    let tree = AccountTree::load(conn).await?;
    if tree.get(id).is_none() {
        return Err(ChartError::not_found("Account", id));
    }

    let subtree = tree.subtree(id);
    if let Some(frozen) = subtree.iter().find(|a| tree.is_leaf_frozen(**a)) {
        warn!("Refusing to delete account {}: account {} has children", id, frozen);
        return Err(ChartError::HasChildren(*frozen));
    }

    let removed = subtree.len();
    let result = account::Entity::delete_many()
        .filter(account::Column::Id.is_in(subtree))
        .exec(conn)
        .await?;

    info!("Account {} deleted ({} accounts removed)", id, removed);
    Ok(result.rows_affected)
}

/// Suggests the next code: a child code of `account_id`, or the next
/// top-level number when no account is given.
#[instrument(skip(conn))]
pub async fn suggest_next_code<C: ConnectionTrait>(conn: &C, account_id: Option<i32>) -> Result<String> {
    let tree = AccountTree::load(conn).await?;

    let code = match account_id {
        Some(id) => {
            let parent = tree.get(id).ok_or(ChartError::not_found("Account", id))?;
            next_child_code(&tree, parent)?.into()
        }
        None => next_root_number(&tree)?.to_string(),
    };

    debug!("Suggested next code {} for account {:?}", code, account_id);
    Ok(code)
}
