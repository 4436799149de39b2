use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

use schema_rest::{app, parse_dump, AppConfig, AppState, MemoryDatabase};

const DUMP: &str = "CREATE TABLE `user` (`id` INT NOT NULL, `email` VARCHAR(255) NOT NULL, `password` TEXT NOT NULL, `name` TEXT, `token` TEXT);";

fn build() -> (Arc<MemoryDatabase>, axum::Router) {
    let tables = parse_dump(DUMP);
    let db = Arc::new(MemoryDatabase::from_schema(&tables));
    let state = AppState::new(db.clone(), b"test-secret", 3600);
    let protected = vec!["/user".to_string(), "/user/{id}".to_string()];
    (db, app(state, &tables, &protected))
}

/// Protected paths taken from the default configuration.
fn build_with_defaults() -> axum::Router {
    let config = AppConfig::from_lookup(|k| (k == "JWT_SECRET").then(|| "test-secret".to_string())).unwrap();
    let tables = parse_dump(DUMP);
    let db = Arc::new(MemoryDatabase::from_schema(&tables));
    let state = AppState::new(db, config.jwt_secret.as_bytes(), config.token_ttl_secs);
    app(state, &tables, &config.protected_paths)
}

async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        req = req.header("authorization", format!("Bearer {}", token));
    }
    let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);
    let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = res.status();
    let bytes = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn signup(app: &axum::Router) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/signup",
        None,
        Some(json!({"email": "ada@example.com", "password": "hunter2", "name": "Ada"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("token in signup response").to_string()
}

#[tokio::test]
async fn protected_path_requires_header() {
    let (_, app) = build();
    let (status, body) = send(&app, "GET", "/user", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Authorization header is missing"}));

    let (status, body) = send(&app, "GET", "/user/1", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Invalid or expired token"}));
}

#[tokio::test]
async fn signup_token_opens_protected_paths() {
    let (db, app) = build();
    let token = signup(&app).await;
    assert_eq!(db.count("user"), 1);

    let (status, body) = send(&app, "GET", "/validateToken", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"valid": true}));

    let (status, body) = send(&app, "GET", "/user", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["email"], "ada@example.com");
    assert_ne!(body[0]["password"], "hunter2");
}

#[tokio::test]
async fn login_checks_password() {
    let (_, app) = build();
    signup(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({"email": "ada@example.com", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Invalid credentials"}));

    let (status, body) = send(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({"email": "ada@example.com", "password": "hunter2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());
}

#[tokio::test]
async fn signup_with_existing_email_does_not_duplicate() {
    let (db, app) = build();
    signup(&app).await;
    signup(&app).await;
    assert_eq!(db.count("user"), 1);
}

#[tokio::test]
async fn malformed_credentials_are_rejected() {
    let (db, app) = build();
    let (status, body) = send(&app, "POST", "/signup", None, Some(json!({"email": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid request data"}));
    assert_eq!(db.count("user"), 0);
}

#[tokio::test]
async fn logout_revokes_token() {
    let (_, app) = build();
    let token = signup(&app).await;

    let (status, body) = send(&app, "POST", "/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Logged out successfully"}));

    let (status, _) = send(&app, "GET", "/validateToken", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/user", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_without_header_is_unauthorized() {
    let (_, app) = build();
    let (status, body) = send(&app, "POST", "/logout", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Authorization header is missing"}));
}

#[tokio::test]
async fn default_config_guards_only_the_user_collection() {
    let app = build_with_defaults();

    let (status, body) = send(&app, "GET", "/user/42", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "User not found"}));

    let (status, body) = send(&app, "GET", "/user", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Authorization header is missing"}));
}
