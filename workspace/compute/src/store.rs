//! Read-side queries over accounts and account types.
//!
//! Listing runs against whatever connection it is given; it does not take the
//! mutation lock.

use model::entities::{account, account_type};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use tracing::{debug, instrument};

use crate::error::{ChartError, Result};

pub const DEFAULT_PAGE_SIZE: u64 = 50;

/// One-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    pub fn new(page: Option<u64>, page_size: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
}

/// Equality filters for account listing; `None` fields are ignored.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    pub id: Option<i32>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<i32>,
    pub account_type_id: Option<i32>,
    pub can_have_entries: Option<bool>,
}

impl AccountFilter {
    fn condition(&self) -> Condition {
        Condition::all()
            .add_option(self.id.map(|v| account::Column::Id.eq(v)))
            .add_option(self.code.clone().map(|v| account::Column::Code.eq(v)))
            .add_option(self.name.clone().map(|v| account::Column::Name.eq(v)))
            .add_option(self.description.clone().map(|v| account::Column::Description.eq(v)))
            .add_option(self.parent_id.map(|v| account::Column::ParentId.eq(v)))
            .add_option(self.account_type_id.map(|v| account::Column::AccountTypeId.eq(v)))
            .add_option(self.can_have_entries.map(|v| account::Column::CanHaveEntries.eq(v)))
    }
}

/// Equality filters for account type listing.
#[derive(Debug, Clone, Default)]
pub struct AccountTypeFilter {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl AccountTypeFilter {
    fn condition(&self) -> Condition {
        Condition::all()
            .add_option(self.id.map(|v| account_type::Column::Id.eq(v)))
            .add_option(self.name.clone().map(|v| account_type::Column::Name.eq(v)))
            .add_option(self.description.clone().map(|v| account_type::Column::Description.eq(v)))
    }
}

#[instrument(skip(conn))]
pub async fn list_accounts<C: ConnectionTrait>(
    conn: &C,
    filter: &AccountFilter,
    page: PageRequest,
) -> Result<Page<account::Model>> {
    let paginator = account::Entity::find()
        .filter(filter.condition())
        .order_by_asc(account::Column::Code)
        .paginate(conn, page.page_size);

    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page.page - 1).await?;
    debug!("Listed {} of {} accounts", items.len(), total);

    Ok(Page {
        items,
        page: page.page,
        page_size: page.page_size,
        total,
    })
}

#[instrument(skip(conn))]
pub async fn list_account_types<C: ConnectionTrait>(
    conn: &C,
    filter: &AccountTypeFilter,
    page: PageRequest,
) -> Result<Page<account_type::Model>> {
    let paginator = account_type::Entity::find()
        .filter(filter.condition())
        .order_by_asc(account_type::Column::Id)
        .paginate(conn, page.page_size);

    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page.page - 1).await?;
    debug!("Listed {} of {} account types", items.len(), total);

    Ok(Page {
        items,
        page: page.page,
        page_size: page.page_size,
        total,
    })
}

pub async fn find_account<C: ConnectionTrait>(conn: &C, id: i32) -> Result<account::Model> {
    account::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(ChartError::not_found("Account", id))
}

pub async fn find_account_type<C: ConnectionTrait>(conn: &C, id: i32) -> Result<account_type::Model> {
    account_type::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(ChartError::not_found("Account type", id))
}

/// Direct children of account `id`, ordered by code.
pub async fn account_children<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Vec<account::Model>> {
    let account = find_account(conn, id).await?;
    Ok(account.get_children(conn).await?)
}
