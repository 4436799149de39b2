//! Bearer-token overlay for protected paths.

use crate::auth::AuthManager;
use crate::error::AppError;
use crate::router::{Middleware, RequestContext};
use async_trait::async_trait;
use axum::http::header;
use std::sync::Arc;

pub struct BearerAuth {
    auth: Arc<AuthManager>,
}

impl BearerAuth {
    pub fn new(auth: Arc<AuthManager>) -> Self {
        BearerAuth { auth }
    }
}

#[async_trait]
impl Middleware for BearerAuth {
    async fn before(&self, req: &RequestContext) -> Result<(), AppError> {
        if !req.headers.contains_key(header::AUTHORIZATION) {
            return Err(AppError::Unauthorized("Authorization header is missing".into()));
        }
        let token = req.bearer_token().unwrap_or("");
        if token.is_empty() || !self.auth.verify_token(token).await? {
            return Err(AppError::Unauthorized("Invalid or expired token".into()));
        }
        Ok(())
    }
}
