use crate::handlers::{
    account_types::{
        create_account_type, delete_account_type, get_account_type, get_account_types,
        update_account_type,
    },
    accounts::{
        create_account, delete_account, get_account, get_account_children, get_accounts,
        get_next_code, update_account,
    },
    health::health_check,
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Chart of accounts
        .route("/api/v1/accounts", post(create_account).get(get_accounts))
        .route("/api/v1/accounts/next-code", get(get_next_code))
        .route(
            "/api/v1/accounts/:account_id",
            get(get_account).put(update_account).delete(delete_account),
        )
        .route("/api/v1/accounts/:account_id/children", get(get_account_children))
        // Account types
        .route("/api/v1/account-types", post(create_account_type).get(get_account_types))
        .route(
            "/api/v1/account-types/:account_type_id",
            get(get_account_type)
                .put(update_account_type)
                .delete(delete_account_type),
        )
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
