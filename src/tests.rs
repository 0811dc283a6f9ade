#[cfg(test)]
mod integration_tests {
    use crate::handlers::account_types::{AccountTypePage, CreateAccountTypeRequest};
    use crate::handlers::accounts::{AccountPage, AccountResponse, NextCodeResponse, UpdateAccountRequest};
    use crate::schemas::{ApiResponse, ErrorResponse, HealthResponse};
    use crate::test_utils::test_utils::{
        create_test_account, create_test_account_type, setup_test_server,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn assert_error(response: &axum_test::TestResponse, status: StatusCode, code: &str) {
        response.assert_status(status);
        let body: ErrorResponse = response.json();
        assert!(!body.success);
        assert_eq!(body.code, code, "unexpected error: {}", body.error);
    }

    /// Root "1" (structural) with a frozen "1.1" that holds a leaf "1.1.1".
    async fn frozen_chart(server: &TestServer) -> (i64, i64, i64, i64) {
        let assets = create_test_account_type(server, "Assets").await;
        let root = create_test_account(
            server,
            json!({ "code": "1", "name": "Assets", "account_type_id": assets }),
        )
        .await;
        let frozen = create_test_account(
            server,
            json!({ "code": "1.1", "name": "Bank", "parent_id": root["id"], "can_have_entries": true }),
        )
        .await;
        let leaf = create_test_account(
            server,
            json!({ "code": "1.1.1", "name": "Checking", "parent_id": frozen["id"], "can_have_entries": true }),
        )
        .await;
        (
            assets,
            root["id"].as_i64().unwrap(),
            frozen["id"].as_i64().unwrap(),
            leaf["id"].as_i64().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = setup_test_server().await;

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: HealthResponse = response.json();
        assert_eq!(body.status, "healthy");
        assert_eq!(body.database, "connected");
    }

    #[tokio::test]
    async fn test_create_account_type() {
        let server = setup_test_server().await;

        let response = server
            .post("/api/v1/account-types")
            .json(&CreateAccountTypeRequest {
                name: "Assets".to_string(),
                description: Some("Things we own".to_string()),
            })
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        assert!(body.success);
        assert_eq!(body.message, "Account type created successfully");
        assert_eq!(body.data["name"], "Assets");
        assert!(body.data["id"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_account_type_name_validation_and_uniqueness() {
        let server = setup_test_server().await;
        create_test_account_type(&server, "Assets").await;

        let response = server
            .post("/api/v1/account-types")
            .json(&json!({ "name": "ab" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .post("/api/v1/account-types")
            .json(&json!({ "name": "assets" }))
            .await;
        assert_error(&response, StatusCode::BAD_REQUEST, "DUPLICATE_NAME");
    }

    #[tokio::test]
    async fn test_account_type_crud() {
        let server = setup_test_server().await;
        let id = create_test_account_type(&server, "Assets").await;
        create_test_account_type(&server, "Liabilities").await;

        let response = server
            .put(&format!("/api/v1/account-types/{}", id))
            .json(&json!({ "description": "Current and fixed assets" }))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["name"], "Assets");
        assert_eq!(body.data["description"], "Current and fixed assets");
        assert!(!body.data["updated_at"].is_null());

        let response = server.get("/api/v1/account-types?name=Liabilities").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<AccountTypePage> = response.json();
        assert_eq!(body.data.total, 1);
        assert_eq!(body.data.items[0].name, "Liabilities");

        let response = server.delete(&format!("/api/v1/account-types/{}", id)).await;
        response.assert_status(StatusCode::NO_CONTENT);

        let response = server.get(&format!("/api/v1/account-types/{}", id)).await;
        assert_error(&response, StatusCode::NOT_FOUND, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_delete_account_type_in_use() {
        let server = setup_test_server().await;
        let (assets, _, _, _) = frozen_chart(&server).await;

        let response = server.delete(&format!("/api/v1/account-types/{}", assets)).await;
        assert_error(&response, StatusCode::BAD_REQUEST, "IN_USE");
    }

    #[tokio::test]
    async fn test_create_root_and_child_accounts() {
        let server = setup_test_server().await;
        let assets = create_test_account_type(&server, "Assets").await;

        let root = create_test_account(
            &server,
            json!({ "code": "1", "name": "Assets", "account_type_id": assets }),
        )
        .await;
        assert_eq!(root["code"], "1");
        assert!(root["parent_id"].is_null());

        // No type given: the child inherits its parent's
        let child = create_test_account(
            &server,
            json!({ "code": "1.1", "name": "Cash", "parent_id": root["id"], "can_have_entries": true }),
        )
        .await;
        assert_eq!(child["account_type_id"], assets);
        assert_eq!(child["parent_id"], root["id"]);
        assert_eq!(child["can_have_entries"], true);

        let response = server.get(&format!("/api/v1/accounts/{}", child["id"])).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<AccountResponse> = response.json();
        assert_eq!(body.data.code, "1.1");
        assert_eq!(body.data.name, "Cash");
    }

    #[tokio::test]
    async fn test_create_account_validation() {
        let server = setup_test_server().await;
        let assets = create_test_account_type(&server, "Assets").await;

        // Name too short
        let response = server
            .post("/api/v1/accounts")
            .json(&json!({ "code": "1", "name": "A", "account_type_id": assets }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        // Step above 999
        let response = server
            .post("/api/v1/accounts")
            .json(&json!({ "code": "1.1000", "name": "Assets", "account_type_id": assets }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        // Root without a type
        let response = server
            .post("/api/v1/accounts")
            .json(&json!({ "code": "1", "name": "Assets" }))
            .await;
        assert_error(&response, StatusCode::BAD_REQUEST, "INVALID_ACCOUNT_TYPE");

        // Unknown parent
        let response = server
            .post("/api/v1/accounts")
            .json(&json!({ "code": "1.1", "name": "Cash", "parent_id": 77 }))
            .await;
        assert_error(&response, StatusCode::BAD_REQUEST, "INVALID_PARENT");
    }

    #[tokio::test]
    async fn test_create_duplicate_code() {
        let server = setup_test_server().await;
        let (assets, _, _, _) = frozen_chart(&server).await;
        let other = create_test_account(
            &server,
            json!({ "code": "2", "name": "Liabilities", "account_type_id": assets }),
        )
        .await;

        let response = server
            .post("/api/v1/accounts")
            .json(&json!({ "code": "1.1.1", "name": "Duplicate", "parent_id": other["id"] }))
            .await;
        assert_error(&response, StatusCode::BAD_REQUEST, "DUPLICATE_CODE");
    }

    #[tokio::test]
    async fn test_codes_are_kept_as_written() {
        let server = setup_test_server().await;
        let (assets, _, _, _) = frozen_chart(&server).await;

        // "01" is a different code from "1"
        let padded = create_test_account(
            &server,
            json!({ "code": "01", "name": "Padded", "account_type_id": assets }),
        )
        .await;
        assert_eq!(padded["code"], "01");

        let child = create_test_account(
            &server,
            json!({ "name": "Padded child", "parent_id": padded["id"] }),
        )
        .await;
        assert_eq!(child["code"], "01.1");

        let response = server
            .post("/api/v1/accounts")
            .json(&json!({ "code": "01", "name": "Again", "account_type_id": assets }))
            .await;
        assert_error(&response, StatusCode::BAD_REQUEST, "DUPLICATE_CODE");
    }

    #[tokio::test]
    async fn test_next_code_with_deep_codes() {
        let server = setup_test_server().await;
        let assets = create_test_account_type(&server, "Assets").await;
        create_test_account(
            &server,
            json!({ "code": "1", "name": "Assets", "account_type_id": assets }),
        )
        .await;
        create_test_account(
            &server,
            json!({ "code": "999.999.999.999.999.999.999", "name": "Deep", "account_type_id": assets }),
        )
        .await;

        let response = server.get("/api/v1/accounts/next-code").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<NextCodeResponse> = response.json();
        assert_eq!(body.data.code, "2");
    }

    #[tokio::test]
    async fn test_create_child_type_mismatch() {
        let server = setup_test_server().await;
        let (_, root, _, _) = frozen_chart(&server).await;
        let costs = create_test_account_type(&server, "Costs").await;

        let response = server
            .post("/api/v1/accounts")
            .json(&json!({ "code": "1.2", "name": "Mismatch", "parent_id": root, "account_type_id": costs }))
            .await;
        assert_error(&response, StatusCode::BAD_REQUEST, "TYPE_MISMATCH");
    }

    #[tokio::test]
    async fn test_create_without_code_uses_next_code() {
        let server = setup_test_server().await;
        let (_, root, _, _) = frozen_chart(&server).await;

        let created = create_test_account(
            &server,
            json!({ "name": "Receivables", "parent_id": root }),
        )
        .await;
        assert_eq!(created["code"], "1.2");
    }

    #[tokio::test]
    async fn test_next_code_endpoint() {
        let server = setup_test_server().await;

        let response = server.get("/api/v1/accounts/next-code").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<NextCodeResponse> = response.json();
        assert_eq!(body.data.code, "1");

        let (_, root, frozen, _) = frozen_chart(&server).await;

        let response = server
            .get("/api/v1/accounts/next-code")
            .add_query_param("account_id", root)
            .await;
        let body: ApiResponse<NextCodeResponse> = response.json();
        assert_eq!(body.data.code, "1.2");

        let response = server
            .get("/api/v1/accounts/next-code")
            .add_query_param("account_id", frozen)
            .await;
        let body: ApiResponse<NextCodeResponse> = response.json();
        assert_eq!(body.data.code, "1.1.2");

        let response = server
            .get("/api/v1/accounts/next-code")
            .add_query_param("account_id", 404)
            .await;
        assert_error(&response, StatusCode::NOT_FOUND, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_list_accounts_with_filters_and_paging() {
        let server = setup_test_server().await;
        let (_, root, _, _) = frozen_chart(&server).await;
        create_test_account(
            &server,
            json!({ "code": "1.2", "name": "Receivables", "parent_id": root, "can_have_entries": true }),
        )
        .await;

        let response = server.get("/api/v1/accounts").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<AccountPage> = response.json();
        assert_eq!(body.data.total, 4);
        let codes: Vec<&str> = body.data.items.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["1", "1.1", "1.1.1", "1.2"]);

        let response = server
            .get("/api/v1/accounts")
            .add_query_param("parent_id", root)
            .await;
        let body: ApiResponse<AccountPage> = response.json();
        assert_eq!(body.data.total, 2);

        let response = server
            .get("/api/v1/accounts")
            .add_query_param("can_have_entries", true)
            .add_query_param("page", 2)
            .add_query_param("page_size", 2)
            .await;
        let body: ApiResponse<AccountPage> = response.json();
        assert_eq!(body.data.total, 3);
        assert_eq!(body.data.page, 2);
        assert_eq!(body.data.items.len(), 1);
        assert_eq!(body.data.items[0].code, "1.2");

        let response = server
            .get("/api/v1/accounts")
            .add_query_param("page_size", 0)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_children() {
        let server = setup_test_server().await;
        let (_, root, frozen, _) = frozen_chart(&server).await;

        let response = server.get(&format!("/api/v1/accounts/{}/children", root)).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<AccountResponse>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0].id as i64, frozen);

        let response = server.get("/api/v1/accounts/999/children").await;
        assert_error(&response, StatusCode::NOT_FOUND, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_account_fields() {
        let server = setup_test_server().await;
        let (_, root, _, _) = frozen_chart(&server).await;

        let response = server
            .put(&format!("/api/v1/accounts/{}", root))
            .json(&UpdateAccountRequest {
                code: Some("5".to_string()),
                name: Some("All assets".to_string()),
                ..Default::default()
            })
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<AccountResponse> = response.json();
        assert_eq!(body.data.code, "5");
        assert_eq!(body.data.name, "All assets");
        assert!(body.data.updated_at.is_some());
        assert!(body.data.parent_id.is_none());
    }

    #[tokio::test]
    async fn test_update_code_of_child_is_rejected() {
        let server = setup_test_server().await;
        let (_, _, _, leaf) = frozen_chart(&server).await;

        let response = server
            .put(&format!("/api/v1/accounts/{}", leaf))
            .json(&json!({ "code": "1.1.7" }))
            .await;
        assert_error(&response, StatusCode::BAD_REQUEST, "CODE_IMMUTABLE_UNDER_PARENT");
    }

    #[tokio::test]
    async fn test_frozen_account_is_locked_until_children_removed() {
        let server = setup_test_server().await;
        let assets = create_test_account_type(&server, "Assets").await;
        let costs = create_test_account_type(&server, "Costs").await;
        let other = create_test_account(
            &server,
            json!({ "code": "9", "name": "Other", "account_type_id": assets }),
        )
        .await;
        let frozen = create_test_account(
            &server,
            json!({ "code": "1", "name": "Cash", "account_type_id": assets, "can_have_entries": true }),
        )
        .await;
        let child = create_test_account(
            &server,
            json!({ "code": "1.1", "name": "Petty cash", "parent_id": frozen["id"], "can_have_entries": true }),
        )
        .await;
        let path = format!("/api/v1/accounts/{}", frozen["id"]);

        let response = server.put(&path).json(&json!({ "code": "3" })).await;
        assert_error(&response, StatusCode::BAD_REQUEST, "CODE_IMMUTABLE_WITH_CHILDREN");

        let response = server.put(&path).json(&json!({ "account_type_id": costs })).await;
        assert_error(&response, StatusCode::BAD_REQUEST, "TYPE_IMMUTABLE_WITH_CHILDREN");

        let response = server.put(&path).json(&json!({ "parent_id": other["id"] })).await;
        assert_error(&response, StatusCode::BAD_REQUEST, "PARENT_IMMUTABLE_WITH_ENTRIES");

        let response = server.delete(&path).await;
        assert_error(&response, StatusCode::BAD_REQUEST, "HAS_CHILDREN");

        server
            .delete(&format!("/api/v1/accounts/{}", child["id"]))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let response = server.put(&path).json(&json!({ "code": "3" })).await;
        response.assert_status(StatusCode::OK);
        let response = server.put(&path).json(&json!({ "account_type_id": costs })).await;
        response.assert_status(StatusCode::OK);
        let response = server.put(&path).json(&json!({ "parent_id": other["id"] })).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<AccountResponse> = response.json();
        assert_eq!(body.data.parent_id.map(i64::from), other["id"].as_i64());
        assert_eq!(i64::from(body.data.account_type_id), assets);
    }

    #[tokio::test]
    async fn test_delete_leaf_account() {
        let server = setup_test_server().await;
        let (_, _, _, leaf) = frozen_chart(&server).await;
        let path = format!("/api/v1/accounts/{}", leaf);

        server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);

        let response = server.get(&path).await;
        assert_error(&response, StatusCode::NOT_FOUND, "NOT_FOUND");

        let response = server.delete(&path).await;
        assert_error(&response, StatusCode::NOT_FOUND, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_missing_account() {
        let server = setup_test_server().await;

        let response = server
            .put("/api/v1/accounts/31")
            .json(&json!({ "name": "Nobody" }))
            .await;
        assert_error(&response, StatusCode::NOT_FOUND, "NOT_FOUND");
    }
}
