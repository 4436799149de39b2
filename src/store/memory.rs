//! In-process [`Database`] seeded from the parsed schema. Rows get an
//! auto-increment `id` when the insert does not supply one.

use crate::error::AppError;
use crate::schema::{TableDescriptor, IDENTITY_COLUMN};
use crate::store::{Database, Fields, Row};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
struct MemoryTable {
    rows: Vec<Row>,
    next_id: i64,
}

#[derive(Default)]
pub struct MemoryDatabase {
    tables: RwLock<HashMap<String, MemoryTable>>,
}

fn row_id(row: &Row) -> Option<i64> {
    row.get(IDENTITY_COLUMN).and_then(Value::as_i64)
}

fn unknown_table(table: &str) -> AppError {
    AppError::Store(format!("table '{}' doesn't exist", table))
}

fn lock_poisoned() -> AppError {
    AppError::Store("memory store lock poisoned".into())
}

fn reject_nested(fields: &Fields) -> Result<(), AppError> {
    match fields.iter().find(|(_, v)| v.is_array() || v.is_object()) {
        Some((key, _)) => Err(AppError::BadRequest(format!("Invalid data type for: {}", key))),
        None => Ok(()),
    }
}

impl MemoryDatabase {
    /// One empty table per descriptor.
    pub fn from_schema(tables: &[TableDescriptor]) -> Self {
        let tables = tables
            .iter()
            .map(|t| {
                let table = MemoryTable {
                    rows: Vec::new(),
                    next_id: 1,
                };
                (t.name.clone(), table)
            })
            .collect();
        MemoryDatabase {
            tables: RwLock::new(tables),
        }
    }

    /// Number of rows currently stored in `table`.
    pub fn count(&self, table: &str) -> usize {
        self.tables
            .read()
            .map(|t| t.get(table).map(|t| t.rows.len()).unwrap_or(0))
            .unwrap_or(0)
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn get_all(&self, table: &str) -> Result<Vec<Row>, AppError> {
        let tables = self.tables.read().map_err(|_| lock_poisoned())?;
        let t = tables.get(table).ok_or_else(|| unknown_table(table))?;
        Ok(t.rows.clone())
    }

    async fn get_by_id(&self, table: &str, id: i64) -> Result<Option<Row>, AppError> {
        let tables = self.tables.read().map_err(|_| lock_poisoned())?;
        let t = tables.get(table).ok_or_else(|| unknown_table(table))?;
        Ok(t.rows.iter().find(|r| row_id(r) == Some(id)).cloned())
    }

    async fn insert(&self, table: &str, fields: &Fields) -> Result<(), AppError> {
        reject_nested(fields)?;
        let mut tables = self.tables.write().map_err(|_| lock_poisoned())?;
        let t = tables.get_mut(table).ok_or_else(|| unknown_table(table))?;
        let mut row = fields.clone();
        let id = match row_id(&row) {
            Some(id) => id,
            None => {
                row.insert(IDENTITY_COLUMN.to_string(), Value::from(t.next_id));
                t.next_id
            }
        };
        if t.rows.iter().any(|r| row_id(r) == Some(id)) {
            return Err(AppError::Store(format!("duplicate entry '{}' for key 'PRIMARY'", id)));
        }
        // Saturates at i64::MAX; later auto ids then collide and are rejected above.
        t.next_id = t.next_id.max(id.saturating_add(1));
        t.rows.push(row);
        Ok(())
    }

    async fn update(&self, table: &str, id: i64, fields: &Fields) -> Result<(), AppError> {
        reject_nested(fields)?;
        let mut tables = self.tables.write().map_err(|_| lock_poisoned())?;
        let t = tables.get_mut(table).ok_or_else(|| unknown_table(table))?;
        if let Some(row) = t.rows.iter_mut().find(|r| row_id(r) == Some(id)) {
            for (k, v) in fields {
                row.insert(k.clone(), v.clone());
            }
        }
        Ok(())
    }

    async fn delete(&self, table: &str, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write().map_err(|_| lock_poisoned())?;
        let t = tables.get_mut(table).ok_or_else(|| unknown_table(table))?;
        t.rows.retain(|r| row_id(r) != Some(id));
        Ok(())
    }

    async fn get(&self, table: &str, filters: &Fields) -> Result<Vec<Row>, AppError> {
        let tables = self.tables.read().map_err(|_| lock_poisoned())?;
        let t = tables.get(table).ok_or_else(|| unknown_table(table))?;
        Ok(t.rows
            .iter()
            .filter(|r| filters.iter().all(|(k, v)| r.get(k) == Some(v)))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
