use crate::schemas::{
    ApiAccountTypePage, ApiAccountTypeResponse, ApiError, ApiResponse, AppState, ErrorResponse,
    error_response,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use compute::{account_types, store};
use model::entities::account_type;
use sea_orm::TransactionTrait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateAccountTypeRequest {
    /// Unique name, compared ignoring case
    #[validate(length(min = 3, max = 50))]
    pub name: String,
    #[validate(length(min = 3, max = 250))]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateAccountTypeRequest {
    #[validate(length(min = 3, max = 50))]
    pub name: Option<String>,
    #[validate(length(min = 3, max = 250))]
    pub description: Option<String>,
}

/// Query parameters for listing account types
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct AccountTypeQuery {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Page number (default: 1)
    #[validate(range(min = 1))]
    pub page: Option<u64>,
    /// Page size (default: 50)
    #[validate(range(min = 1, max = 1000))]
    pub page_size: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountTypeResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<account_type::Model> for AccountTypeResponse {
    fn from(model: account_type::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountTypePage {
    pub items: Vec<AccountTypeResponse>,
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
}

/// Create a new account type
#[utoipa::path(
    post,
    path = "/api/v1/account-types",
    tag = "account-types",
    request_body = CreateAccountTypeRequest,
    responses(
        (status = 201, description = "Account type created successfully", body = ApiAccountTypeResponse),
        (status = 400, description = "Invalid request or duplicate name", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_account_type(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateAccountTypeRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<AccountTypeResponse>>), ApiError> {
    trace!("Entering create_account_type function");

    let _lock = state.mutations.lock().await;
    let txn = state.db.begin().await.map_err(|e| error_response(e.into()))?;
    let created = account_types::create_account_type(
        &txn,
        account_types::NewAccountType {
            name: request.name,
            description: request.description,
        },
    )
    .await
    .map_err(error_response)?;
    txn.commit().await.map_err(|e| error_response(e.into()))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            AccountTypeResponse::from(created),
            "Account type created successfully",
        )),
    ))
}

/// List account types
#[utoipa::path(
    get,
    path = "/api/v1/account-types",
    tag = "account-types",
    params(AccountTypeQuery),
    responses(
        (status = 200, description = "Account types retrieved successfully", body = ApiAccountTypePage),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_account_types(
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<AccountTypeQuery>>,
) -> Result<Json<ApiResponse<AccountTypePage>>, ApiError> {
    let filter = store::AccountTypeFilter {
        id: query.id,
        name: query.name,
        description: query.description,
    };
    let page = store::list_account_types(
        &state.db,
        &filter,
        store::PageRequest::new(query.page, query.page_size),
    )
    .await
    .map_err(error_response)?;
    debug!("Retrieved {} of {} account types", page.items.len(), page.total);

    Ok(Json(ApiResponse::ok(
        AccountTypePage {
            items: page.items.into_iter().map(AccountTypeResponse::from).collect(),
            page: page.page,
            page_size: page.page_size,
            total: page.total,
        },
        "Account types retrieved successfully",
    )))
}

/// Get a specific account type by ID
#[utoipa::path(
    get,
    path = "/api/v1/account-types/{account_type_id}",
    tag = "account-types",
    params(
        ("account_type_id" = i32, Path, description = "Account type ID"),
    ),
    responses(
        (status = 200, description = "Account type retrieved successfully", body = ApiAccountTypeResponse),
        (status = 404, description = "Account type not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_account_type(
    Path(account_type_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AccountTypeResponse>>, ApiError> {
    let account_type = store::find_account_type(&state.db, account_type_id)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::ok(
        AccountTypeResponse::from(account_type),
        "Account type retrieved successfully",
    )))
}

/// Update an account type
#[utoipa::path(
    put,
    path = "/api/v1/account-types/{account_type_id}",
    tag = "account-types",
    params(
        ("account_type_id" = i32, Path, description = "Account type ID"),
    ),
    request_body = UpdateAccountTypeRequest,
    responses(
        (status = 200, description = "Account type updated successfully", body = ApiAccountTypeResponse),
        (status = 400, description = "Invalid request or duplicate name", body = ErrorResponse),
        (status = 404, description = "Account type not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_account_type(
    Path(account_type_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateAccountTypeRequest>>,
) -> Result<Json<ApiResponse<AccountTypeResponse>>, ApiError> {
    let _lock = state.mutations.lock().await;
    let txn = state.db.begin().await.map_err(|e| error_response(e.into()))?;
    let updated = account_types::update_account_type(
        &txn,
        account_type_id,
        account_types::AccountTypeChanges {
            name: request.name,
            description: request.description,
        },
    )
    .await
    .map_err(error_response)?;
    txn.commit().await.map_err(|e| error_response(e.into()))?;

    Ok(Json(ApiResponse::ok(
        AccountTypeResponse::from(updated),
        "Account type updated successfully",
    )))
}

/// Delete an account type no account uses
#[utoipa::path(
    delete,
    path = "/api/v1/account-types/{account_type_id}",
    tag = "account-types",
    params(
        ("account_type_id" = i32, Path, description = "Account type ID"),
    ),
    responses(
        (status = 204, description = "Account type deleted successfully"),
        (status = 400, description = "Account type is still in use", body = ErrorResponse),
        (status = 404, description = "Account type not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_account_type(
    Path(account_type_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let _lock = state.mutations.lock().await;
    let txn = state.db.begin().await.map_err(|e| error_response(e.into()))?;
    account_types::delete_account_type(&txn, account_type_id)
        .await
        .map_err(error_response)?;
    txn.commit().await.map_err(|e| error_response(e.into()))?;

    Ok(StatusCode::NO_CONTENT)
}
