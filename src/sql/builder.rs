//! Builds parameterized SELECT, INSERT, UPDATE, DELETE statements for MySQL.
//! Identifiers are backtick-quoted; values always travel as `?` parameters.

use crate::error::AppError;
use crate::sql::BindValue;
use crate::store::Fields;

/// Quote identifier for MySQL.
fn quoted(s: &str) -> String {
    format!("`{}`", s.replace('`', "``"))
}

#[derive(Debug, Default)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf::default()
    }
}

/// SELECT every row.
pub fn select_all(table: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT * FROM {}", quoted(table));
    q
}

/// SELECT by `id`.
pub fn select_by_id(table: &str, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT * FROM {} WHERE {} = ?", quoted(table), quoted("id"));
    q.params.push(BindValue::I64(id));
    q
}

/// SELECT with exact-match filters joined by AND. No filters selects every row.
pub fn select_where(table: &str, filters: &Fields) -> Result<QueryBuf, AppError> {
    let mut q = select_all(table);
    let mut where_parts = Vec::with_capacity(filters.len());
    for (col, val) in filters {
        q.params.push(BindValue::from_json(col, val)?);
        where_parts.push(format!("{} = ?", quoted(col)));
    }
    if !where_parts.is_empty() {
        q.sql.push_str(" WHERE ");
        q.sql.push_str(&where_parts.join(" AND "));
    }
    Ok(q)
}

/// INSERT: columns and placeholders in body order.
pub fn insert(table: &str, body: &Fields) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(body.len());
    for (col, val) in body {
        q.params.push(BindValue::from_json(col, val)?);
        cols.push(quoted(col));
    }
    let placeholders = vec!["?"; cols.len()].join(", ");
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quoted(table),
        cols.join(", "),
        placeholders
    );
    Ok(q)
}

/// UPDATE by `id`: SET every column present in body.
pub fn update(table: &str, id: i64, body: &Fields) -> Result<QueryBuf, AppError> {
    if body.is_empty() {
        return Err(AppError::BadRequest("Invalid request body".into()));
    }
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(body.len());
    for (col, val) in body {
        q.params.push(BindValue::from_json(col, val)?);
        sets.push(format!("{} = ?", quoted(col)));
    }
    q.params.push(BindValue::I64(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        quoted(table),
        sets.join(", "),
        quoted("id")
    );
    Ok(q)
}

/// DELETE by `id`.
pub fn delete(table: &str, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("DELETE FROM {} WHERE {} = ?", quoted(table), quoted("id"));
    q.params.push(BindValue::I64(id));
    q
}
