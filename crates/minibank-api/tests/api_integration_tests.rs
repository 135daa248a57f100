//! API Integration Tests
//!
//! Drives the full router over the in-memory account store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use minibank_api::{create_test_router, AppState};
use minibank_auth::{AuthConfig, AuthService, TOKEN_HEADER};
use minibank_db::{AccountStore, InMemoryAccountStore};

const PASSWORD: &str = "correct horse battery";

struct TestApp {
    router: Router,
    store: Arc<InMemoryAccountStore>,
}

fn test_app() -> TestApp {
    let mut auth_config = AuthConfig::default();
    auth_config.jwt.secret = "integration-test-secret-at-least-32-bytes".to_string();
    auth_config.password.memory_cost = 4096;
    auth_config.password.time_cost = 1;
    let auth = Arc::new(AuthService::new(auth_config).unwrap());

    let store = Arc::new(InMemoryAccountStore::new());
    let state = Arc::new(AppState::new(store.clone(), auth));

    TestApp {
        router: create_test_router(state),
        store,
    }
}

/// Test helper to make a request and get JSON response
async fn json_request(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");

    if let Some(token) = token {
        request = request.header(TOKEN_HEADER, token);
    }

    let body = match body {
        Some(json_body) => Body::from(serde_json::to_vec(&json_body).unwrap()),
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!(null));

    (status, json)
}

/// Open an account, returning (number, token)
async fn register(app: &TestApp, first: &str, last: &str) -> (i64, String) {
    let (status, json) = json_request(
        &app.router,
        "POST",
        "/account",
        None,
        Some(json!({"firstname": first, "lastname": last, "password": PASSWORD})),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "register failed: {}", json);
    (
        json["number"].as_i64().unwrap(),
        json["token"].as_str().unwrap().to_string(),
    )
}

fn denied() -> Value {
    json!({"error": "permission denied"})
}

// =============================================================================
// Registration & Login
// =============================================================================

mod registration_and_login {
    use super::*;

    #[tokio::test]
    async fn test_register_returns_session() {
        let app = test_app();

        let (status, json) = json_request(
            &app.router,
            "POST",
            "/account",
            None,
            Some(json!({"firstname": "Alice", "lastname": "Smith", "password": PASSWORD})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["firstname"], "Alice");
        assert_eq!(json["lastname"], "Smith");
        assert!(json["token"].as_str().is_some_and(|t| !t.is_empty()));

        let number = json["number"].as_i64().unwrap();
        assert!((0..1_000_000).contains(&number));

        let stored = app.store.get_account_by_number(number).await.unwrap();
        assert_eq!(stored.balance, 0);
        assert_ne!(stored.encrypted_password, PASSWORD);
    }

    #[tokio::test]
    async fn test_register_rejects_weak_password() {
        let app = test_app();

        let (status, json) = json_request(
            &app.router,
            "POST",
            "/account",
            None,
            Some(json!({"firstname": "Alice", "lastname": "Smith", "password": "short"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
        assert!(app.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_json() {
        let app = test_app();

        let request = Request::builder()
            .method("POST")
            .uri("/account")
            .header("Content-Type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_login_roundtrip() {
        let app = test_app();
        let (number, _) = register(&app, "Alice", "Smith").await;

        let (status, json) = json_request(
            &app.router,
            "POST",
            "/login",
            None,
            Some(json!({"number": number, "password": PASSWORD})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["number"], number);
        assert_eq!(json["firstname"], "Alice");

        // The fresh token opens the account
        let token = json["token"].as_str().unwrap();
        let (status, _) =
            json_request(&app.router, "GET", &format!("/account/{}", number), Some(token), None)
                .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_failures_look_alike() {
        let app = test_app();
        let (number, _) = register(&app, "Alice", "Smith").await;

        let (status, wrong_password) = json_request(
            &app.router,
            "POST",
            "/login",
            None,
            Some(json!({"number": number, "password": "not the password"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let unknown = if number == 1 { 2 } else { 1 };
        let (status, unknown_account) = json_request(
            &app.router,
            "POST",
            "/login",
            None,
            Some(json!({"number": unknown, "password": PASSWORD})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(wrong_password, json!({"error": "not authenticated"}));
        assert_eq!(wrong_password, unknown_account);
    }

    #[tokio::test]
    async fn test_list_accounts() {
        let app = test_app();
        register(&app, "Alice", "Smith").await;
        register(&app, "Bob", "Jones").await;

        let (status, json) = json_request(&app.router, "GET", "/account", None, None).await;

        assert_eq!(status, StatusCode::OK);
        let accounts = json.as_array().unwrap();
        assert_eq!(accounts.len(), 2);
        for account in accounts {
            assert!(account.get("firstname").is_some());
            assert!(account.get("number").is_some());
            assert!(account.get("token").is_none());
        }
    }
}

// =============================================================================
// Protected Account Endpoints
// =============================================================================

mod protected_accounts {
    use super::*;

    #[tokio::test]
    async fn test_owner_reads_account() {
        let app = test_app();
        let (number, token) = register(&app, "Alice", "Smith").await;

        let (status, json) =
            json_request(&app.router, "GET", &format!("/account/{}", number), Some(&token), None)
                .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["number"], number);
        assert_eq!(json["firstName"], "Alice");
        assert_eq!(json["lastName"], "Smith");
        assert_eq!(json["balance"], 0);
        assert!(json.get("id").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("encryptedPassword").is_none());
    }

    #[tokio::test]
    async fn test_missing_token_denied() {
        let app = test_app();
        let (number, _) = register(&app, "Alice", "Smith").await;

        let (status, json) =
            json_request(&app.router, "GET", &format!("/account/{}", number), None, None).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json, denied());
    }

    #[tokio::test]
    async fn test_foreign_token_denied() {
        let app = test_app();
        let (alice, _) = register(&app, "Alice", "Smith").await;
        let (_, bob_token) = register(&app, "Bob", "Jones").await;

        let (status, json) =
            json_request(&app.router, "GET", &format!("/account/{}", alice), Some(&bob_token), None)
                .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json, denied());

        let (status, json) = json_request(
            &app.router,
            "DELETE",
            &format!("/account/{}", alice),
            Some(&bob_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json, denied());
        assert!(app.store.get_account_by_number(alice).await.is_ok());
    }

    #[tokio::test]
    async fn test_bad_path_parameter_denied() {
        let app = test_app();
        let (_, token) = register(&app, "Alice", "Smith").await;

        let (status, json) =
            json_request(&app.router, "GET", "/account/not-a-number", Some(&token), None).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json, denied());
    }

    #[tokio::test]
    async fn test_owner_deletes_account() {
        let app = test_app();
        let (number, token) = register(&app, "Alice", "Smith").await;

        let (status, json) = json_request(
            &app.router,
            "DELETE",
            &format!("/account/{}", number),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"deleted": number}));
        assert!(app.store.is_empty().await);

        // The token no longer resolves to a live account
        let (status, json) =
            json_request(&app.router, "GET", &format!("/account/{}", number), Some(&token), None)
                .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json, denied());
    }
}

// =============================================================================
// Transfers
// =============================================================================

mod transfers {
    use super::*;

    async fn balance(app: &TestApp, number: i64) -> i64 {
        app.store.get_account_by_number(number).await.unwrap().balance
    }

    #[tokio::test]
    async fn test_unfunded_transfer_refused_then_funded_transfer_applied() {
        let app = test_app();
        let (alice, alice_token) = register(&app, "Alice", "Smith").await;
        let (bob, bob_token) = register(&app, "Bob", "Jones").await;
        app.store.update_balance(bob, 100).await.unwrap();

        let (status, json) = json_request(
            &app.router,
            "POST",
            "/transfer",
            Some(&alice_token),
            Some(json!({"toAccountNumber": bob, "amount": 50})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("insufficient"));
        assert_eq!(balance(&app, alice).await, 0);
        assert_eq!(balance(&app, bob).await, 100);

        let (status, json) = json_request(
            &app.router,
            "POST",
            "/transfer",
            Some(&bob_token),
            Some(json!({"toAccountNumber": alice, "amount": 30})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!("amount transferred"));
        assert_eq!(balance(&app, alice).await, 30);
        assert_eq!(balance(&app, bob).await, 70);
    }

    #[tokio::test]
    async fn test_self_transfer_refused() {
        let app = test_app();
        let (alice, token) = register(&app, "Alice", "Smith").await;
        app.store.update_balance(alice, 100).await.unwrap();

        let (status, json) = json_request(
            &app.router,
            "POST",
            "/transfer",
            Some(&token),
            Some(json!({"toAccountNumber": alice, "amount": 10})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
        assert_eq!(balance(&app, alice).await, 100);
    }

    #[tokio::test]
    async fn test_non_positive_amount_refused() {
        let app = test_app();
        let (alice, token) = register(&app, "Alice", "Smith").await;
        let (bob, _) = register(&app, "Bob", "Jones").await;
        app.store.update_balance(alice, 100).await.unwrap();

        for amount in [0, -10] {
            let (status, json) = json_request(
                &app.router,
                "POST",
                "/transfer",
                Some(&token),
                Some(json!({"toAccountNumber": bob, "amount": amount})),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(json["error"].is_string());
        }

        assert_eq!(balance(&app, alice).await, 100);
        assert_eq!(balance(&app, bob).await, 0);
    }

    #[tokio::test]
    async fn test_unknown_destination_refused() {
        let app = test_app();
        let (alice, token) = register(&app, "Alice", "Smith").await;
        app.store.update_balance(alice, 100).await.unwrap();

        let missing = if alice == 1_000_001 { 1_000_002 } else { 1_000_001 };
        let (status, json) = json_request(
            &app.router,
            "POST",
            "/transfer",
            Some(&token),
            Some(json!({"toAccountNumber": missing, "amount": 10})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("not found"));
        assert_eq!(balance(&app, alice).await, 100);
    }

    #[tokio::test]
    async fn test_transfer_requires_token() {
        let app = test_app();
        let (bob, _) = register(&app, "Bob", "Jones").await;

        let (status, json) = json_request(
            &app.router,
            "POST",
            "/transfer",
            None,
            Some(json!({"toAccountNumber": bob, "amount": 10})),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json, denied());
    }

    #[tokio::test]
    async fn test_garbage_token_denied() {
        let app = test_app();
        let (bob, _) = register(&app, "Bob", "Jones").await;

        let (status, json) = json_request(
            &app.router,
            "POST",
            "/transfer",
            Some("not.a.token"),
            Some(json!({"toAccountNumber": bob, "amount": 10})),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json, denied());
    }
}

// =============================================================================
// Operational Endpoints
// =============================================================================

mod operational {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let (status, json) = json_request(&app.router, "GET", "/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_openapi_document() {
        let app = test_app();
        let (status, json) =
            json_request(&app.router, "GET", "/api-docs/openapi.json", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["paths"].get("/transfer").is_some());
    }
}
