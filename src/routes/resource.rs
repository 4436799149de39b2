//! Derives the five CRUD routes for every table in the schema.

use crate::handlers::{ResourceAction, ResourceHandler};
use crate::router::{RouteEntry, RouteTable, ID_PARAM};
use crate::schema::TableDescriptor;
use crate::store::Database;
use axum::http::Method;
use std::sync::Arc;

pub fn collection_path(table: &str) -> String {
    format!("/{}", table)
}

pub fn member_path(table: &str) -> String {
    format!("/{}/{{{}}}", table, ID_PARAM)
}

/// List, show, create, update and delete for one table.
pub fn resource_routes(table: &str, db: &Arc<dyn Database>) -> Vec<RouteEntry> {
    ResourceAction::ALL
        .iter()
        .map(|&action| {
            let (method, path) = match action {
                ResourceAction::List => (Method::GET, collection_path(table)),
                ResourceAction::Show => (Method::GET, member_path(table)),
                ResourceAction::Create => (Method::POST, collection_path(table)),
                ResourceAction::Update => (Method::PUT, member_path(table)),
                ResourceAction::Delete => (Method::DELETE, member_path(table)),
            };
            RouteEntry {
                method,
                path,
                handler: Arc::new(ResourceHandler::new(action, table, db.clone())),
            }
        })
        .collect()
}

/// Routes for every table, in schema order.
pub fn derive_routes(tables: &[TableDescriptor], db: &Arc<dyn Database>) -> Vec<RouteEntry> {
    tables
        .iter()
        .flat_map(|t| resource_routes(&t.name, db))
        .collect()
}

pub fn define_routes_for_tables(router: &mut RouteTable, db: &Arc<dyn Database>, tables: &[TableDescriptor]) {
    let entries = derive_routes(tables, db);
    tracing::info!(tables = tables.len(), routes = entries.len(), "registering resource routes");
    router.register_all(entries);
}
