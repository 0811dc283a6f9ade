#[cfg(test)]
pub mod test_utils {
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use axum_test::TestServer;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};
    use serde_json::{json, Value};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    pub async fn setup_test_app_state() -> AppState {
        AppState::new(setup_test_db().await)
    }

    /// Installs a stderr subscriber for the current thread. The level comes
    /// from `RUST_LOG` and defaults to WARN.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| level.parse::<Level>().ok())
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        let _guard = init_test_tracing();
        create_router(setup_test_app_state().await)
    }

    pub async fn setup_test_server() -> TestServer {
        TestServer::new(setup_test_app().await).expect("Failed to start test server")
    }

    /// Creates an account type and returns its ID.
    pub async fn create_test_account_type(server: &TestServer, name: &str) -> i64 {
        let response = server
            .post("/api/v1/account-types")
            .json(&json!({ "name": name, "description": format!("{} accounts", name) }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let body: Value = response.json();
        body["data"]["id"].as_i64().expect("account type id")
    }

    /// Creates an account from a raw JSON body and returns the created record.
    pub async fn create_test_account(server: &TestServer, body: Value) -> Value {
        let response = server.post("/api/v1/accounts").json(&body).await;
        if response.status_code() != axum::http::StatusCode::CREATED {
            panic!(
                "Expected 201 Created, got {}: {}",
                response.status_code(),
                response.text()
            );
        }
        let body: Value = response.json();
        body["data"].clone()
    }
}
