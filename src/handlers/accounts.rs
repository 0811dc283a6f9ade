use crate::schemas::{
    ApiAccountList, ApiAccountPage, ApiAccountResponse, ApiError, ApiNextCodeResponse,
    ApiResponse, AppState, ErrorResponse, error_response,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use compute::{accounts, store};
use model::Code;
use model::entities::account;
use sea_orm::TransactionTrait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

fn validate_code(code: &str) -> Result<(), ValidationError> {
    if Code::is_valid(code) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_code"))
    }
}

/// Request body for creating a new account
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateAccountRequest {
    /// Dotted code (e.g. "4.1.2"); allocated automatically when omitted
    #[validate(custom(function = "validate_code"))]
    pub code: Option<String>,
    /// Account name
    #[validate(length(min = 3, max = 100))]
    pub name: String,
    /// Account description
    #[validate(length(min = 3, max = 250))]
    pub description: Option<String>,
    /// Whether the account can record entries (default: false)
    #[serde(default)]
    pub can_have_entries: bool,
    /// Parent account ID; omitted for root accounts
    pub parent_id: Option<i32>,
    /// Account type ID; required for root accounts, inherited otherwise
    pub account_type_id: Option<i32>,
}

impl From<CreateAccountRequest> for accounts::NewAccount {
    fn from(request: CreateAccountRequest) -> Self {
        Self {
            code: request.code,
            name: request.name,
            description: request.description,
            can_have_entries: request.can_have_entries,
            parent_id: request.parent_id,
            account_type_id: request.account_type_id,
        }
    }
}

/// Request body for updating an account. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateAccountRequest {
    #[validate(custom(function = "validate_code"))]
    pub code: Option<String>,
    #[validate(length(min = 3, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 3, max = 250))]
    pub description: Option<String>,
    pub can_have_entries: Option<bool>,
    pub account_type_id: Option<i32>,
    pub parent_id: Option<i32>,
}

impl From<UpdateAccountRequest> for accounts::AccountChanges {
    fn from(request: UpdateAccountRequest) -> Self {
        Self {
            code: request.code,
            name: request.name,
            description: request.description,
            can_have_entries: request.can_have_entries,
            account_type_id: request.account_type_id,
            parent_id: request.parent_id,
        }
    }
}

/// Query parameters for listing accounts
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct AccountQuery {
    pub id: Option<i32>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<i32>,
    pub account_type_id: Option<i32>,
    pub can_have_entries: Option<bool>,
    /// Page number (default: 1)
    #[validate(range(min = 1))]
    pub page: Option<u64>,
    /// Page size (default: 50)
    #[validate(range(min = 1, max = 1000))]
    pub page_size: Option<u64>,
}

/// Query parameters for the next-code suggestion
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NextCodeQuery {
    /// Account that will receive the new child; omit for a top-level suggestion
    pub account_id: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NextCodeResponse {
    pub code: String,
}

/// Account response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub can_have_entries: bool,
    pub parent_id: Option<i32>,
    pub account_type_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<account::Model> for AccountResponse {
    fn from(model: account::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            name: model.name,
            description: model.description,
            can_have_entries: model.can_have_entries,
            parent_id: model.parent_id,
            account_type_id: model.account_type_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// One page of accounts
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountPage {
    pub items: Vec<AccountResponse>,
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
}

/// Create a new account
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    tag = "accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created successfully", body = ApiAccountResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_account(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateAccountRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<AccountResponse>>), ApiError> {
    trace!("Entering create_account function");

    let _lock = state.mutations.lock().await;
    let txn = state.db.begin().await.map_err(|e| error_response(e.into()))?;
    let created = accounts::create_account(&txn, request.into())
        .await
        .map_err(error_response)?;
    txn.commit().await.map_err(|e| error_response(e.into()))?;

    info!("Account created successfully with ID: {}, code: {}", created.id, created.code);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            AccountResponse::from(created),
            "Account created successfully",
        )),
    ))
}

/// List accounts
#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    tag = "accounts",
    params(AccountQuery),
    responses(
        (status = 200, description = "Accounts retrieved successfully", body = ApiAccountPage),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_accounts(
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<AccountQuery>>,
) -> Result<Json<ApiResponse<AccountPage>>, ApiError> {
    trace!("Entering get_accounts function");

    let paging = store::PageRequest::new(query.page, query.page_size);
    let filter = store::AccountFilter {
        id: query.id,
        code: query.code,
        name: query.name,
        description: query.description,
        parent_id: query.parent_id,
        account_type_id: query.account_type_id,
        can_have_entries: query.can_have_entries,
    };

    let page = store::list_accounts(&state.db, &filter, paging)
        .await
        .map_err(error_response)?;
    debug!("Retrieved {} of {} accounts", page.items.len(), page.total);

    Ok(Json(ApiResponse::ok(
        AccountPage {
            items: page.items.into_iter().map(AccountResponse::from).collect(),
            page: page.page,
            page_size: page.page_size,
            total: page.total,
        },
        "Accounts retrieved successfully",
    )))
}

/// Get a specific account by ID
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{account_id}",
    tag = "accounts",
    params(
        ("account_id" = i32, Path, description = "Account ID"),
    ),
    responses(
        (status = 200, description = "Account retrieved successfully", body = ApiAccountResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_account(
    Path(account_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    let account = store::find_account(&state.db, account_id)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::ok(
        AccountResponse::from(account),
        "Account retrieved successfully",
    )))
}

/// Update an account
#[utoipa::path(
    put,
    path = "/api/v1/accounts/{account_id}",
    tag = "accounts",
    params(
        ("account_id" = i32, Path, description = "Account ID"),
    ),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated successfully", body = ApiAccountResponse),
        (status = 400, description = "Update violates a chart rule", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_account(
    Path(account_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateAccountRequest>>,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    trace!("Entering update_account function for account_id: {}", account_id);

    let _lock = state.mutations.lock().await;
    let txn = state.db.begin().await.map_err(|e| error_response(e.into()))?;
    let updated = accounts::update_account(&txn, account_id, request.into())
        .await
        .map_err(error_response)?;
    txn.commit().await.map_err(|e| error_response(e.into()))?;

    Ok(Json(ApiResponse::ok(
        AccountResponse::from(updated),
        "Account updated successfully",
    )))
}

/// Delete an account and the accounts below it
#[utoipa::path(
    delete,
    path = "/api/v1/accounts/{account_id}",
    tag = "accounts",
    params(
        ("account_id" = i32, Path, description = "Account ID"),
    ),
    responses(
        (status = 204, description = "Account deleted successfully"),
        (status = 400, description = "Account has children and can't be removed", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_account(
    Path(account_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    trace!("Entering delete_account function for account_id: {}", account_id);

    let _lock = state.mutations.lock().await;
    let txn = state.db.begin().await.map_err(|e| error_response(e.into()))?;
    let removed = accounts::delete_account(&txn, account_id)
        .await
        .map_err(error_response)?;
    txn.commit().await.map_err(|e| error_response(e.into()))?;

    debug!("Removed {} rows for account {}", removed, account_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Direct children of an account
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{account_id}/children",
    tag = "accounts",
    params(
        ("account_id" = i32, Path, description = "Account ID"),
    ),
    responses(
        (status = 200, description = "Children retrieved successfully", body = ApiAccountList),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_account_children(
    Path(account_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<AccountResponse>>>, ApiError> {
    let children = store::account_children(&state.db, account_id)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::ok(
        children.into_iter().map(AccountResponse::from).collect(),
        "Child accounts retrieved successfully",
    )))
}

/// Suggest the next free code
#[utoipa::path(
    get,
    path = "/api/v1/accounts/next-code",
    tag = "accounts",
    params(NextCodeQuery),
    responses(
        (status = 200, description = "Next code computed", body = ApiNextCodeResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_next_code(
    State(state): State<AppState>,
    Query(query): Query<NextCodeQuery>,
) -> Result<Json<ApiResponse<NextCodeResponse>>, ApiError> {
    let _lock = state.mutations.lock().await;
    let code = accounts::suggest_next_code(&state.db, query.account_id)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::ok(
        NextCodeResponse { code },
        "Next code computed successfully",
    )))
}
