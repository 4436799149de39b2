//! Route assembly: derived resource routes, auth routes, operational routes.

pub mod auth;
pub mod common;
pub mod resource;

pub use auth::{auth_routes, protect_paths};
pub use common::{common_routes, COMMON_PATHS};
pub use resource::{define_routes_for_tables, derive_routes, resource_routes};

use crate::router::RouteTable;
use crate::schema::TableDescriptor;
use crate::state::AppState;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Largest accepted request body.
pub const BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

/// Tables whose collection path `/{table}` is taken by an operational route.
/// List and create are unreachable for them; member routes still work.
pub fn shadowed_tables(tables: &[TableDescriptor]) -> Vec<&str> {
    tables
        .iter()
        .filter(|t| COMMON_PATHS.contains(&resource::collection_path(&t.name).as_str()))
        .map(|t| t.name.as_str())
        .collect()
}

/// Route table for the auth endpoints plus every table, with the bearer
/// overlay on `protected_paths`.
pub fn route_table(state: &AppState, tables: &[TableDescriptor], protected_paths: &[String]) -> RouteTable {
    for name in shadowed_tables(tables) {
        tracing::warn!(table = %name, "/{} is an operational route; list and create are unreachable", name);
    }
    let mut table = RouteTable::new();
    auth_routes(&mut table, &state.auth);
    define_routes_for_tables(&mut table, &state.db, tables);
    protect_paths(&mut table, &state.auth, protected_paths);
    table
}

/// The complete HTTP application.
pub fn app(state: AppState, tables: &[TableDescriptor], protected_paths: &[String]) -> axum::Router {
    let table = route_table(&state, tables, protected_paths);
    common_routes(state)
        .merge(table.into_service())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
