use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

use schema_rest::{
    app,
    error::{AppError, GENERIC_FAULT_MESSAGE},
    parse_dump,
    store::{Fields, Row},
    AppState, Database, MemoryDatabase, TableDescriptor,
};

const DUMP: &str = "CREATE TABLE `post` (`id` INT NOT NULL, `title` TEXT NOT NULL, `views` INT, `author` VARCHAR(80));";

fn tables() -> Vec<TableDescriptor> {
    parse_dump(DUMP)
}

fn build(db: Arc<dyn Database>) -> axum::Router {
    let state = AppState::new(db, b"test-secret", 3600);
    app(state, &tables(), &[])
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();
    let status = res.status();
    let bytes = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn list_starts_empty() {
    let app = build(Arc::new(MemoryDatabase::from_schema(&tables())));
    let (status, body) = send(&app, "GET", "/post", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn crud_round_trip() {
    let db = Arc::new(MemoryDatabase::from_schema(&tables()));
    let app = build(db.clone());

    let (status, body) = send(&app, "POST", "/post", Some(json!({"title": "hello", "views": 3}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"message": "Post created successfully"}));
    assert_eq!(db.count("post"), 1);

    let (status, body) = send(&app, "GET", "/post/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "hello");
    assert_eq!(body["views"], 3);

    let (status, body) = send(&app, "PUT", "/post/1", Some(json!({"views": 4}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Post updated successfully"}));
    let (_, body) = send(&app, "GET", "/post/1", None).await;
    assert_eq!(body["views"], 4);
    assert_eq!(body["title"], "hello");

    let (status, body) = send(&app, "DELETE", "/post/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Post deleted successfully"}));
    assert_eq!(db.count("post"), 0);
}

#[tokio::test]
async fn missing_row_is_not_found() {
    let app = build(Arc::new(MemoryDatabase::from_schema(&tables())));
    let (status, body) = send(&app, "GET", "/post/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Post not found"}));
}

#[tokio::test]
async fn empty_body_is_rejected_without_writing() {
    let db = Arc::new(MemoryDatabase::from_schema(&tables()));
    let app = build(db.clone());

    let (status, body) = send(&app, "POST", "/post", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid request body"}));

    let (status, _) = send(&app, "POST", "/post", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "PUT", "/post/1", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(db.count("post"), 0);
}

#[tokio::test]
async fn nested_values_are_rejected() {
    let db = Arc::new(MemoryDatabase::from_schema(&tables()));
    let app = build(db.clone());
    let (status, body) = send(&app, "POST", "/post", Some(json!({"title": ["a"]}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid data type for: title"}));
    assert_eq!(db.count("post"), 0);
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() {
    let app = build(Arc::new(MemoryDatabase::from_schema(&tables())));
    let (status, body) = send(&app, "GET", "/post/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid id"}));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = build(Arc::new(MemoryDatabase::from_schema(&tables())));
    let (status, body) = send(&app, "GET", "/comment", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Route not found"}));

    let (status, _) = send(&app, "PATCH", "/post/1", Some(json!({"views": 1}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deep_paths_use_second_segment_as_id() {
    let app = build(Arc::new(MemoryDatabase::from_schema(&tables())));
    send(&app, "POST", "/post", Some(json!({"title": "t"}))).await;
    let (status, body) = send(&app, "GET", "/post/1/extra", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "t");
}

#[tokio::test]
async fn max_client_id_does_not_break_later_requests() {
    let db = Arc::new(MemoryDatabase::from_schema(&tables()));
    let app = build(db.clone());

    let (status, _) = send(&app, "POST", "/post", Some(json!({"id": i64::MAX, "title": "x"}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "GET", "/post", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], json!(i64::MAX));

    let (status, body) = send(&app, "POST", "/post", Some(json!({"title": "y"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to create post"}));

    let (status, _) = send(&app, "POST", "/post", Some(json!({"id": 2, "title": "z"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(db.count("post"), 2);
}

/// Writes fail and some reads cannot reach the server.
struct BrokenDatabase;

#[async_trait]
impl Database for BrokenDatabase {
    async fn get_all(&self, _table: &str) -> Result<Vec<Row>, AppError> {
        Err(AppError::Unavailable("connection refused".into()))
    }

    async fn get_by_id(&self, _table: &str, _id: i64) -> Result<Option<Row>, AppError> {
        Err(AppError::Store("boom".into()))
    }

    async fn insert(&self, _table: &str, _fields: &Fields) -> Result<(), AppError> {
        Err(AppError::Store("duplicate entry".into()))
    }

    async fn update(&self, _table: &str, _id: i64, _fields: &Fields) -> Result<(), AppError> {
        Err(AppError::Unavailable("connection refused".into()))
    }

    async fn delete(&self, _table: &str, _id: i64) -> Result<(), AppError> {
        Err(AppError::Store("lock wait timeout".into()))
    }

    async fn get(&self, _table: &str, _filters: &Fields) -> Result<Vec<Row>, AppError> {
        Ok(Vec::new())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::Unavailable("connection refused".into()))
    }
}

#[tokio::test]
async fn failed_write_names_the_operation() {
    let app = build(Arc::new(BrokenDatabase));

    let (status, body) = send(&app, "POST", "/post", Some(json!({"title": "x"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to create post"}));

    let (status, body) = send(&app, "DELETE", "/post/3", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to delete post"}));
}

#[tokio::test]
async fn store_faults_hide_details() {
    let app = build(Arc::new(BrokenDatabase));

    let (status, body) = send(&app, "GET", "/post", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"error": {"code": 503, "message": GENERIC_FAULT_MESSAGE}}));

    let (status, _) = send(&app, "PUT", "/post/1", Some(json!({"title": "x"}))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, body) = send(&app, "GET", "/post/1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": {"code": 500, "message": GENERIC_FAULT_MESSAGE}}));
}

#[tokio::test]
async fn operational_routes() {
    let app = build(Arc::new(MemoryDatabase::from_schema(&tables())));
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = send(&app, "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");

    let broken = build(Arc::new(BrokenDatabase));
    let (status, body) = send(&broken, "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
}
