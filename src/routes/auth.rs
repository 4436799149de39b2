//! Fixed auth routes and the bearer overlay for protected paths.

use crate::auth::{AuthManager, BearerAuth};
use crate::handlers::{AuthAction, AuthHandler};
use crate::router::RouteTable;
use std::sync::Arc;

/// Methods the bearer overlay is applied to.
pub const PROTECTED_METHODS: &str = "GET|POST|PUT|DELETE";

/// `/login` answers GET as well as POST.
pub fn auth_routes(router: &mut RouteTable, auth: &Arc<AuthManager>) {
    let handler = |action| Arc::new(AuthHandler::new(action, auth.clone()));
    router.get("/login", handler(AuthAction::Login));
    router.post("/login", handler(AuthAction::Login));
    router.post("/signup", handler(AuthAction::Signup));
    router.post("/logout", handler(AuthAction::Logout));
    router.get("/validateToken", handler(AuthAction::ValidateToken));
}

/// Require a valid bearer token on each path (exact dispatch keys).
pub fn protect_paths(router: &mut RouteTable, auth: &Arc<AuthManager>, paths: &[String]) {
    let guard = Arc::new(BearerAuth::new(auth.clone()));
    for path in paths {
        tracing::debug!(path = %path, "protecting path");
        router.apply_middleware(PROTECTED_METHODS, path, guard.clone());
    }
}
