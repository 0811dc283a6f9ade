use crate::code::{Code, CodeError};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, EntityTrait, QueryOrder, RelationTrait};

/// Represents a node of the chart of accounts.
/// Accounts are hierarchical; the dotted `code` mirrors the position in the tree
/// (e.g. "4" -> "4.1" -> "4.1.2").
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Canonical dotted code, unique across the whole chart.
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    /// Leaf accounts that can record ledger entries.
    pub can_have_entries: bool,
    /// Self-referencing foreign key; `None` for root accounts.
    pub parent_id: Option<i32>,
    /// Always resolved: explicit on roots, the parent's type on children.
    pub account_type_id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_delete = "Cascade"
    )]
    Parent,
    #[sea_orm(
        belongs_to = "super::account_type::Entity",
        from = "Column::AccountTypeId",
        to = "super::account_type::Column::Id",
        on_delete = "Restrict"
    )]
    AccountType,
}

impl Related<Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parent.def()
    }

    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::account_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Parses the stored code.
    pub fn code(&self) -> Result<Code, CodeError> {
        Code::parse(&self.code)
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Gets all direct children of this account, ordered by code.
    pub async fn get_children<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::ParentId.eq(self.id))
            .order_by_asc(Column::Code)
            .all(db)
            .await
    }
}
