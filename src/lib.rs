//! Schema REST: reads a MySQL schema dump and derives a JSON CRUD API over
//! its tables plus TypeScript interfaces for API clients.

pub mod auth;
pub mod codegen;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod response;
pub mod router;
pub mod routes;
pub mod schema;
pub mod sql;
pub mod state;
pub mod store;

pub use auth::AuthManager;
pub use codegen::{emit_module, write_output, TypeMap};
pub use config::AppConfig;
pub use error::{AppError, CodegenError, ConfigError, SchemaError};
pub use logging::init_tracing;
pub use router::{Middleware, RequestContext, RouteHandler, RouteTable};
pub use routes::{app, route_table};
pub use schema::{load_dump, parse_dump, ColumnDescriptor, TableDescriptor};
pub use state::AppState;
pub use store::{Database, MemoryDatabase, MySqlDatabase};
