//! Shared application state for all routes.

use crate::auth::AuthManager;
use crate::store::Database;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub auth: Arc<AuthManager>,
}

impl AppState {
    pub fn new(db: Arc<dyn Database>, jwt_secret: &[u8], token_ttl_secs: u64) -> Self {
        let auth = AuthManager::new(jwt_secret, db.clone()).with_ttl(token_ttl_secs);
        AppState {
            db,
            auth: Arc::new(auth),
        }
    }
}
