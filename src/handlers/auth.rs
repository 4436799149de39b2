//! Fixed auth endpoints: login, signup, logout, token validation.

use crate::auth::AuthManager;
use crate::error::AppError;
use crate::response;
use crate::router::{RequestContext, RouteHandler};
use async_trait::async_trait;
use axum::{http::StatusCode, response::Response};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    Signup,
    Logout,
    ValidateToken,
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
    #[serde(default)]
    name: String,
}

fn credentials(req: &RequestContext) -> Result<Credentials, AppError> {
    req.json_object()
        .and_then(|body| serde_json::from_value(Value::Object(body)).ok())
        .ok_or_else(|| AppError::BadRequest("Invalid request data".into()))
}

fn invalid_token() -> AppError {
    AppError::Unauthorized("Invalid or expired token".into())
}

pub struct AuthHandler {
    action: AuthAction,
    auth: Arc<AuthManager>,
}

impl AuthHandler {
    pub fn new(action: AuthAction, auth: Arc<AuthManager>) -> Self {
        AuthHandler { action, auth }
    }

    fn issued(token: Option<String>) -> Result<Response, AppError> {
        token
            .map(response::token)
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))
    }

    fn bearer<'a>(&self, req: &'a RequestContext) -> Result<&'a str, AppError> {
        match req.bearer_token() {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(AppError::Unauthorized("Authorization header is missing".into())),
        }
    }
}

#[async_trait]
impl RouteHandler for AuthHandler {
    async fn handle(&self, req: &RequestContext) -> Result<Response, AppError> {
        match self.action {
            AuthAction::Login => {
                let c = credentials(req)?;
                Self::issued(self.auth.login(&c.email, &c.password).await?)
            }
            AuthAction::Signup => {
                let c = credentials(req)?;
                Self::issued(self.auth.signup(&c.email, &c.password, &c.name).await?)
            }
            AuthAction::Logout => {
                let token = self.bearer(req)?;
                if !self.auth.logout(token).await? {
                    return Err(invalid_token());
                }
                Ok(response::message(StatusCode::OK, "Logged out successfully"))
            }
            AuthAction::ValidateToken => {
                let token = self.bearer(req)?;
                if !self.auth.verify_token(token).await? {
                    return Err(invalid_token());
                }
                Ok(response::ok(json!({ "valid": true })))
            }
        }
    }
}
