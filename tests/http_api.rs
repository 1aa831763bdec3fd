//! HTTP contract tests over the assembled router, exercising the wire
//! shapes, status codes, and the auth middleware without binding a port.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use ledgerdesk::http_server::config::BootstrapAdmin;
use ledgerdesk::http_server::{HttpConfig, HttpServer};

fn app() -> Router {
    HttpServer::with_config(HttpConfig::default())
        .unwrap()
        .router()
}

fn app_with_admin() -> Router {
    let config = HttpConfig {
        bootstrap_admin: Some(BootstrapAdmin {
            email: "ops@x.com".to_string(),
            password: "ops-secret".to_string(),
        }),
        ..Default::default()
    };
    HttpServer::with_config(config).unwrap().router()
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn signup(app: &Router, email: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
    body
}

async fn login(app: &Router, email: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body
}

#[tokio::test]
async fn health_is_public() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn signup_login_verify_logout_cycle() {
    let app = app();

    let created = signup(&app, "a@x.com", "secret1").await;
    assert!(created["token"].is_string());
    assert!(created["userId"].is_string());
    assert_eq!(created["email"], "a@x.com");

    let logged_in = login(&app, "a@x.com", "secret1").await;
    let token = logged_in["token"].as_str().unwrap().to_string();
    assert_ne!(token, created["token"].as_str().unwrap());
    assert_eq!(logged_in["user"]["email"], "a@x.com");
    assert_eq!(logged_in["user"]["role"], "client");

    let (status, body) = send(&app, Method::GET, "/auth/verify", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["role"], "client");

    let (status, body) = send(&app, Method::POST, "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    // Revoked token no longer verifies
    let (status, _) = send(&app, Method::GET, "/auth/verify", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = app();
    signup(&app, "a@x.com", "secret1").await;

    let (wrong_pw_status, wrong_pw_body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": "a@x.com", "password": "not-it"})),
    )
    .await;
    let (no_user_status, no_user_body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": "ghost@x.com", "password": "secret1"})),
    )
    .await;

    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(no_user_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw_body, json!({"error": "Invalid email or password"}));
    assert_eq!(no_user_body, wrong_pw_body);
}

#[tokio::test]
async fn missing_body_fields_are_bad_requests() {
    let app = app();

    // Signup without a password at all
    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({"email": "a@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // Login without a password at all
    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": "a@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn signup_rejects_bad_input() {
    let app = app();

    // Password below the minimum
    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({"email": "a@x.com", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // Email without an '@'
    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({"email": "not-an-email", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Duplicate, case-insensitively
    signup(&app, "a@x.com", "secret1").await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({"email": "A@X.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn protected_routes_require_a_valid_bearer() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/transactions", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Invalid or expired session"}));

    // Wrong scheme
    let request = Request::builder()
        .method(Method::GET)
        .uri("/auth/verify")
        .header(header::AUTHORIZATION, "Basic abc123")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Well-formed but unknown token
    let (status, body) = send(
        &app,
        Method::GET,
        "/auth/verify",
        Some("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Invalid or expired session"}));
}

#[tokio::test]
async fn logout_is_idempotent_over_http() {
    let app = app();
    let created = signup(&app, "a@x.com", "secret1").await;
    let token = created["token"].as_str().unwrap().to_string();

    let (first, _) = send(&app, Method::POST, "/auth/logout", Some(&token), None).await;
    let (second, _) = send(&app, Method::POST, "/auth/logout", Some(&token), None).await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);

    // Logout of a never-issued token also succeeds
    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/logout",
        Some("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn user_management_is_admin_only() {
    let app = app_with_admin();

    let admin = login(&app, "ops@x.com", "ops-secret").await;
    let admin_token = admin["token"].as_str().unwrap().to_string();

    let client = signup(&app, "c@x.com", "secret1").await;
    let client_token = client["token"].as_str().unwrap().to_string();

    // Clients can neither list nor create users
    let (status, _) = send(&app, Method::GET, "/users", Some(&client_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(&client_token),
        Some(json!({"email": "x@x.com", "password": "secret1", "role": "client"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"error": "Access denied"}));

    // Admin creates a user and sees everyone
    let (status, created) = send(
        &app,
        Method::POST,
        "/users",
        Some(&admin_token),
        Some(json!({"email": "new@x.com", "password": "secret1", "role": "client", "name": "New"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let new_id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::GET, "/users", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);

    // Admin deletes the new user
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/users/{new_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn admin_cannot_delete_own_account() {
    let app = app_with_admin();
    let admin = login(&app, "ops@x.com", "ops-secret").await;
    let token = admin["token"].as_str().unwrap().to_string();
    let admin_id = admin["user"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/users/{admin_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Cannot delete your own account"}));
}

#[tokio::test]
async fn transactions_are_scoped_to_their_owner() {
    let app = app_with_admin();

    let alice = signup(&app, "alice@x.com", "secret1").await;
    let alice_token = alice["token"].as_str().unwrap().to_string();
    let bob = signup(&app, "bob@x.com", "secret1").await;
    let bob_token = bob["token"].as_str().unwrap().to_string();

    let draft = json!({
        "customerId": "CUST-1",
        "origin": "Rotterdam",
        "destination": "Hamburg",
        "date": "2026-08-30",
        "time": "10:00",
        "price": 420.5
    });

    let (status, created) = send(
        &app,
        Method::POST,
        "/transactions",
        Some(&alice_token),
        Some(draft.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let tx_id = created["transaction"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["transaction"]["userId"], alice["userId"]);

    // Bob's listing is empty; Alice sees her record
    let (_, body) = send(&app, Method::GET, "/transactions", Some(&bob_token), None).await;
    assert_eq!(body["total"], 0);
    let (_, body) = send(
        &app,
        Method::GET,
        "/transactions",
        Some(&alice_token),
        None,
    )
    .await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["transactions"][0]["customerId"], "CUST-1");

    // Bob can neither update nor delete Alice's record
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/transactions/{tx_id}"),
        Some(&bob_token),
        Some(draft.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/transactions/{tx_id}"),
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The owner updates it; an admin may delete it
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/transactions/{tx_id}"),
        Some(&alice_token),
        Some(draft),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let admin = login(&app, "ops@x.com", "ops-secret").await;
    let admin_token = admin["token"].as_str().unwrap().to_string();
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/transactions/{tx_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn admin_can_record_on_behalf_of_a_client() {
    let app = app_with_admin();

    let client = signup(&app, "c@x.com", "secret1").await;
    let client_id = client["userId"].as_str().unwrap().to_string();
    let client_token = client["token"].as_str().unwrap().to_string();

    let admin = login(&app, "ops@x.com", "ops-secret").await;
    let admin_token = admin["token"].as_str().unwrap().to_string();

    let (status, created) = send(
        &app,
        Method::POST,
        "/transactions",
        Some(&admin_token),
        Some(json!({
            "customerId": "CUST-2",
            "origin": "Oslo",
            "destination": "Bergen",
            "date": "2026-08-30",
            "time": "09:30",
            "price": 99.0,
            "userId": client_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["transaction"]["userId"].as_str().unwrap(), client_id);

    // A client attempting the same assignment is refused
    let (status, _) = send(
        &app,
        Method::POST,
        "/transactions",
        Some(&client_token),
        Some(json!({
            "customerId": "CUST-3",
            "origin": "Oslo",
            "destination": "Bergen",
            "date": "2026-08-30",
            "time": "09:30",
            "price": 99.0,
            "userId": admin["user"]["id"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn change_password_requires_current_password() {
    let app = app();
    let created = signup(&app, "a@x.com", "secret1").await;
    let token = created["token"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::POST,
        "/users/change-password",
        Some(&token),
        Some(json!({"currentPassword": "wrong", "newPassword": "next-secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/users/change-password",
        Some(&token),
        Some(json!({"currentPassword": "secret1", "newPassword": "next-secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    login(&app, "a@x.com", "next-secret").await;
}
