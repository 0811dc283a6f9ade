use model::CodeError;
use thiserror::Error;

/// Error types for the chart of accounts core.
///
/// Every guard refusal maps to exactly one variant; `Database` is the only
/// infrastructure failure and is never produced by a validation rule.
#[derive(Error, Debug)]
pub enum ChartError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Invalid code: {0}")]
    InvalidCode(#[from] CodeError),

    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("Code '{0}' is already in use")]
    DuplicateCode(String),

    #[error("Account type name '{0}' is already in use")]
    DuplicateName(String),

    #[error("Child account can't have type {requested} different from parent account type {parent}")]
    TypeMismatch { requested: i32, parent: i32 },

    #[error("Invalid account type: {0}")]
    InvalidAccountType(String),

    #[error("Invalid parent account: {0}")]
    InvalidParent(String),

    #[error("Can't change code of account {0} because it has a parent account")]
    CodeImmutableUnderParent(i32),

    #[error("Can't change code of account {0} because it has child accounts")]
    CodeImmutableWithChildren(i32),

    #[error("Can't change type of account {0} because it has a parent account")]
    TypeImmutableUnderParent(i32),

    #[error("Can't change type of account {0} because it has child accounts")]
    TypeImmutableWithChildren(i32),

    #[error("Can't change parent of account {0} because it holds entries and child accounts")]
    ParentImmutableWithEntries(i32),

    #[error("Can't remove account {0} because it has child accounts")]
    HasChildren(i32),

    #[error("Can't delete account type {0} because it has active accounts")]
    InUse(i32),

    #[error("No free top-level number above {0}")]
    CodeSpaceExhausted(u128),
}

impl ChartError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        ChartError::NotFound { entity, id }
    }

    /// Stable machine-readable kind, surfaced to API clients.
    pub fn kind(&self) -> &'static str {
        match self {
            ChartError::Database(_) => "DATABASE_ERROR",
            ChartError::InvalidCode(_) => "INVALID_CODE",
            ChartError::NotFound { .. } => "NOT_FOUND",
            ChartError::DuplicateCode(_) => "DUPLICATE_CODE",
            ChartError::DuplicateName(_) => "DUPLICATE_NAME",
            ChartError::TypeMismatch { .. } => "TYPE_MISMATCH",
            ChartError::InvalidAccountType(_) => "INVALID_ACCOUNT_TYPE",
            ChartError::InvalidParent(_) => "INVALID_PARENT",
            ChartError::CodeImmutableUnderParent(_) => "CODE_IMMUTABLE_UNDER_PARENT",
            ChartError::CodeImmutableWithChildren(_) => "CODE_IMMUTABLE_WITH_CHILDREN",
            ChartError::TypeImmutableUnderParent(_) => "TYPE_IMMUTABLE_UNDER_PARENT",
            ChartError::TypeImmutableWithChildren(_) => "TYPE_IMMUTABLE_WITH_CHILDREN",
            ChartError::ParentImmutableWithEntries(_) => "PARENT_IMMUTABLE_WITH_ENTRIES",
            ChartError::HasChildren(_) => "HAS_CHILDREN",
            ChartError::InUse(_) => "IN_USE",
            ChartError::CodeSpaceExhausted(_) => "CODE_SPACE_EXHAUSTED",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ChartError::NotFound { .. })
    }

    /// True for persistence failures, as opposed to a refused request.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, ChartError::Database(_))
    }
}

/// Type alias for Result with ChartError
pub type Result<T> = std::result::Result<T, ChartError>;
