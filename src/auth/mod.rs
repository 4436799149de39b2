//! Token auth backed by rows of the `user` table.
//!
//! A token is valid when its signature and expiry check out and it equals the
//! token currently stored on the user's row, so logging out (clearing the
//! stored token) revokes it.

pub mod guard;
pub mod jwt;
pub mod password;

pub use guard::BearerAuth;
pub use jwt::{Claims, JwtKeys};

use crate::error::AppError;
use crate::store::{Database, Fields, Row};
use serde_json::Value;
use std::sync::Arc;

pub const USER_TABLE: &str = "user";
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

fn fields<const N: usize>(pairs: [(&str, Value); N]) -> Fields {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn user_id(row: &Row) -> Result<i64, AppError> {
    row.get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| AppError::Internal("user row has no integer id".into()))
}

pub struct AuthManager {
    keys: JwtKeys,
    db: Arc<dyn Database>,
    ttl_secs: u64,
}

impl AuthManager {
    pub fn new(secret: &[u8], db: Arc<dyn Database>) -> Self {
        AuthManager {
            keys: JwtKeys::from_secret(secret),
            db,
            ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    pub fn with_ttl(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    pub fn generate_token(&self, user_id: i64) -> Result<String, AppError> {
        jwt::encode_token(&self.keys, &jwt::make_claims(user_id, self.ttl_secs))
    }

    /// Store faults propagate; every other failure is `Ok(false)`.
    pub async fn verify_token(&self, token: &str) -> Result<bool, AppError> {
        let claims = match jwt::decode_token(&self.keys, token) {
            Ok(claims) => claims,
            Err(err) => {
                tracing::debug!(error = %err, "token rejected");
                return Ok(false);
            }
        };
        let users = self
            .db
            .get(USER_TABLE, &fields([("id", Value::from(claims.user_id))]))
            .await?;
        let stored = users.first().and_then(|u| u.get("token")).and_then(Value::as_str);
        Ok(stored == Some(token))
    }

    /// Issue a token and store it on the user's row. `None` for unknown email
    /// or wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<String>, AppError> {
        let users = self
            .db
            .get(USER_TABLE, &fields([("email", Value::from(email))]))
            .await?;
        let Some(user) = users.first() else {
            return Ok(None);
        };
        let hash = user.get("password").and_then(Value::as_str).unwrap_or("");
        if !password::verify_password(password, hash) {
            return Ok(None);
        }

        let id = user_id(user)?;
        let token = self.generate_token(id)?;
        self.db
            .update(USER_TABLE, id, &fields([("token", Value::from(token.as_str()))]))
            .await?;
        tracing::info!(user_id = id, "user logged in");
        Ok(Some(token))
    }

    /// Create the user when the email is new, then log in.
    pub async fn signup(&self, email: &str, password: &str, name: &str) -> Result<Option<String>, AppError> {
        let existing = self
            .db
            .get(USER_TABLE, &fields([("email", Value::from(email))]))
            .await?;
        if existing.is_empty() {
            let hashed = password::hash_password(password)?;
            let user = fields([
                ("email", Value::from(email)),
                ("password", Value::from(hashed)),
                ("name", Value::from(name)),
                ("token", Value::from("")),
            ]);
            self.db.insert(USER_TABLE, &user).await?;
            tracing::info!("user signed up");
        }
        self.login(email, password).await
    }

    /// Clear the stored token. `false` when the token does not decode.
    pub async fn logout(&self, token: &str) -> Result<bool, AppError> {
        let Ok(claims) = jwt::decode_token(&self.keys, token) else {
            return Ok(false);
        };
        self.db
            .update(USER_TABLE, claims.user_id, &fields([("token", Value::from(""))]))
            .await?;
        Ok(true)
    }
}
