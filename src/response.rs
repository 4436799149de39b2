//! JSON response helpers shared by the resource and auth handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Serialize)]
pub struct TokenBody {
    pub token: String,
}

/// Any serializable payload with an explicit status.
pub fn json<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(data)).into_response()
}

/// 200 with the payload as-is (rows are not wrapped in an envelope).
pub fn ok<T: Serialize>(data: T) -> Response {
    json(StatusCode::OK, data)
}

/// `{"message": ...}` with the given status.
pub fn message(status: StatusCode, message: impl Into<String>) -> Response {
    json(
        status,
        MessageBody {
            message: message.into(),
        },
    )
}

pub fn token(token: String) -> Response {
    ok(TokenBody { token })
}
