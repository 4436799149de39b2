//! Data-access collaborator used by the derived routes and the auth layer.

mod memory;
mod mysql;

pub use memory::MemoryDatabase;
pub use mysql::MySqlDatabase;

use crate::error::AppError;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// One result row, column name -> JSON value.
pub type Row = Map<String, Value>;

/// Column values supplied by a client or used as exact-match filters.
pub type Fields = Map<String, Value>;

/// Generic table access. Table names come from the parsed schema; ids are
/// the integer `id` column.
#[async_trait]
pub trait Database: Send + Sync {
    async fn get_all(&self, table: &str) -> Result<Vec<Row>, AppError>;

    async fn get_by_id(&self, table: &str, id: i64) -> Result<Option<Row>, AppError>;

    async fn insert(&self, table: &str, fields: &Fields) -> Result<(), AppError>;

    async fn update(&self, table: &str, id: i64, fields: &Fields) -> Result<(), AppError>;

    async fn delete(&self, table: &str, id: i64) -> Result<(), AppError>;

    /// Rows matching every filter exactly.
    async fn get(&self, table: &str, filters: &Fields) -> Result<Vec<Row>, AppError>;

    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), AppError>;
}
