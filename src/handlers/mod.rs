//! Route handlers: per-table CRUD and the fixed auth endpoints.

pub mod auth;
pub mod resource;
pub use auth::{AuthAction, AuthHandler};
pub use resource::{ResourceAction, ResourceHandler};
