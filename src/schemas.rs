use std::sync::Arc;

use axum::{http::StatusCode, response::Json};
use compute::ChartError;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::error;
use utoipa::{OpenApi, ToSchema};

use crate::handlers::{
    account_types::{
        AccountTypePage, AccountTypeQuery, AccountTypeResponse, CreateAccountTypeRequest,
        UpdateAccountTypeRequest,
    },
    accounts::{
        AccountPage, AccountQuery, AccountResponse, CreateAccountRequest, NextCodeQuery,
        NextCodeResponse, UpdateAccountRequest,
    },
};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Held for the whole check-and-write sequence of every mutation, so two
    /// requests never validate against the same snapshot.
    pub mutations: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            mutations: Arc::new(Mutex::new(())),
        }
    }
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[aliases(
    ApiAccountResponse = ApiResponse<AccountResponse>,
    ApiAccountPage = ApiResponse<AccountPage>,
    ApiAccountList = ApiResponse<Vec<AccountResponse>>,
    ApiNextCodeResponse = ApiResponse<NextCodeResponse>,
    ApiAccountTypeResponse = ApiResponse<AccountTypeResponse>,
    ApiAccountTypePage = ApiResponse<AccountTypePage>,
)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Machine-readable error kind (e.g. `DUPLICATE_CODE`)
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Maps a core error onto its HTTP status and error body.
pub fn error_response(err: ChartError) -> ApiError {
    let status = if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if err.is_infrastructure() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::BAD_REQUEST
    };

    let message = if err.is_infrastructure() {
        error!("Database error: {}", err);
        "Internal database error".to_string()
    } else {
        err.to_string()
    };

    (
        status,
        Json(ErrorResponse {
            error: message,
            code: err.kind().to_string(),
            success: false,
        }),
    )
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::accounts::create_account,
        crate::handlers::accounts::get_accounts,
        crate::handlers::accounts::get_account,
        crate::handlers::accounts::update_account,
        crate::handlers::accounts::delete_account,
        crate::handlers::accounts::get_account_children,
        crate::handlers::accounts::get_next_code,
        crate::handlers::account_types::create_account_type,
        crate::handlers::account_types::get_account_types,
        crate::handlers::account_types::get_account_type,
        crate::handlers::account_types::update_account_type,
        crate::handlers::account_types::delete_account_type,
    ),
    components(
        schemas(
            ApiAccountResponse,
            ApiAccountPage,
            ApiAccountList,
            ApiNextCodeResponse,
            ApiAccountTypeResponse,
            ApiAccountTypePage,
            ErrorResponse,
            HealthResponse,
            AccountResponse,
            AccountPage,
            AccountQuery,
            CreateAccountRequest,
            UpdateAccountRequest,
            NextCodeQuery,
            NextCodeResponse,
            AccountTypeResponse,
            AccountTypePage,
            AccountTypeQuery,
            CreateAccountTypeRequest,
            UpdateAccountTypeRequest,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "accounts", description = "Chart of accounts management"),
        (name = "account-types", description = "Account type management"),
    ),
    info(
        title = "Chartrust API",
        description = "Hierarchical chart of accounts with automatic code allocation",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
