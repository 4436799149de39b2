//! CRUD handlers for one table: list, show, create, update, delete.

use crate::codegen::capitalize;
use crate::error::AppError;
use crate::response;
use crate::router::{RequestContext, RouteHandler, ID_PARAM};
use crate::store::Database;
use async_trait::async_trait;
use axum::{http::StatusCode, response::Response};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceAction {
    List,
    Show,
    Create,
    Update,
    Delete,
}

impl ResourceAction {
    pub const ALL: [ResourceAction; 5] = [
        ResourceAction::List,
        ResourceAction::Show,
        ResourceAction::Create,
        ResourceAction::Update,
        ResourceAction::Delete,
    ];
}

/// Handles one action on one table. The table name and data-access
/// collaborator are fixed at construction.
pub struct ResourceHandler {
    action: ResourceAction,
    resource: String,
    db: Arc<dyn Database>,
}

impl ResourceHandler {
    pub fn new(action: ResourceAction, resource: impl Into<String>, db: Arc<dyn Database>) -> Self {
        ResourceHandler {
            action,
            resource: resource.into(),
            db,
        }
    }

    pub fn action(&self) -> ResourceAction {
        self.action
    }

    /// Resource name as shown in messages, e.g. "User".
    fn title(&self) -> String {
        capitalize(&self.resource)
    }

    /// Non-numeric ids are rejected before touching the store.
    fn id(&self, req: &RequestContext) -> Result<i64, AppError> {
        req.param(ID_PARAM)
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or_else(|| AppError::BadRequest("Invalid id".into()))
    }

    /// Connectivity faults pass through as 503; anything else becomes the
    /// client-facing "Failed to ..." message.
    fn write_failed(&self, verb: &str, err: AppError) -> AppError {
        if err.is_unavailable() {
            return err;
        }
        if let AppError::BadRequest(_) = err {
            return err;
        }
        tracing::error!(resource = %self.resource, error = %err, "failed to {} row", verb);
        AppError::Failed(format!("Failed to {} {}", verb, self.resource))
    }

    async fn list(&self) -> Result<Response, AppError> {
        let rows = self.db.get_all(&self.resource).await?;
        Ok(response::ok(rows))
    }

    async fn show(&self, req: &RequestContext) -> Result<Response, AppError> {
        let id = self.id(req)?;
        match self.db.get_by_id(&self.resource, id).await? {
            Some(row) => Ok(response::ok(row)),
            None => Err(AppError::NotFound(format!("{} not found", self.title()))),
        }
    }

    async fn create(&self, req: &RequestContext) -> Result<Response, AppError> {
        let body = req
            .json_object()
            .ok_or_else(|| AppError::BadRequest("Invalid request body".into()))?;
        self.db
            .insert(&self.resource, &body)
            .await
            .map_err(|e| self.write_failed("create", e))?;
        Ok(response::message(
            StatusCode::CREATED,
            format!("{} created successfully", self.title()),
        ))
    }

    async fn update(&self, req: &RequestContext) -> Result<Response, AppError> {
        let id = self.id(req)?;
        let body = req
            .json_object()
            .ok_or_else(|| AppError::BadRequest("Invalid request body".into()))?;
        self.db
            .update(&self.resource, id, &body)
            .await
            .map_err(|e| self.write_failed("update", e))?;
        Ok(response::message(
            StatusCode::OK,
            format!("{} updated successfully", self.title()),
        ))
    }

    async fn delete(&self, req: &RequestContext) -> Result<Response, AppError> {
        let id = self.id(req)?;
        self.db
            .delete(&self.resource, id)
            .await
            .map_err(|e| self.write_failed("delete", e))?;
        Ok(response::message(
            StatusCode::OK,
            format!("{} deleted successfully", self.title()),
        ))
    }
}

#[async_trait]
impl RouteHandler for ResourceHandler {
    async fn handle(&self, req: &RequestContext) -> Result<Response, AppError> {
        match self.action {
            ResourceAction::List => self.list().await,
            ResourceAction::Show => self.show(req).await,
            ResourceAction::Create => self.create(req).await,
            ResourceAction::Update => self.update(req).await,
            ResourceAction::Delete => self.delete(req).await,
        }
    }
}
