//! MySQL-backed [`Database`] using sqlx.

use crate::error::AppError;
use crate::sql::{self, BindValue, QueryBuf};
use crate::store::{Database, Fields, Row};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Row as _};

#[derive(Clone)]
pub struct MySqlDatabase {
    pool: MySqlPool,
}

impl MySqlDatabase {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlDatabase { pool }
    }

    /// Lazily connecting pool; the first query surfaces connectivity faults.
    pub fn connect_lazy(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(database_url)?;
        Ok(MySqlDatabase { pool })
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    async fn fetch_all(&self, q: &QueryBuf) -> Result<Vec<Row>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_all(sqlx::query(&q.sql), &q.params)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<Row>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_all(sqlx::query(&q.sql), &q.params)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(row_to_json))
    }

    async fn execute(&self, q: &QueryBuf) -> Result<(), AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
        let result = bind_all(sqlx::query(&q.sql), &q.params)
            .execute(&self.pool)
            .await?;
        tracing::debug!(rows_affected = result.rows_affected(), "executed");
        Ok(())
    }
}

type MySqlQuery<'q> = sqlx::query::Query<'q, sqlx::MySql, sqlx::mysql::MySqlArguments>;

fn bind_all<'q>(mut query: MySqlQuery<'q>, params: &'q [BindValue]) -> MySqlQuery<'q> {
    for p in params {
        query = match p {
            BindValue::Null => query.bind(Option::<String>::None),
            BindValue::Bool(b) => query.bind(*b),
            BindValue::I64(n) => query.bind(*n),
            BindValue::F64(n) => query.bind(*n),
            BindValue::String(s) => query.bind(s.as_str()),
        };
    }
    query
}

#[async_trait]
impl Database for MySqlDatabase {
    async fn get_all(&self, table: &str) -> Result<Vec<Row>, AppError> {
        self.fetch_all(&sql::select_all(table)).await
    }

    async fn get_by_id(&self, table: &str, id: i64) -> Result<Option<Row>, AppError> {
        self.fetch_optional(&sql::select_by_id(table, id)).await
    }

    async fn insert(&self, table: &str, fields: &Fields) -> Result<(), AppError> {
        self.execute(&sql::insert(table, fields)?).await
    }

    async fn update(&self, table: &str, id: i64, fields: &Fields) -> Result<(), AppError> {
        self.execute(&sql::update(table, id, fields)?).await
    }

    async fn delete(&self, table: &str, id: i64) -> Result<(), AppError> {
        self.execute(&sql::delete(table, id)).await
    }

    async fn get(&self, table: &str, filters: &Fields) -> Result<Vec<Row>, AppError> {
        self.fetch_all(&sql::select_where(table, filters)?).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

fn row_to_json(row: &MySqlRow) -> Row {
    let mut map = Row::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    map
}

fn cell_to_value(row: &MySqlRow, name: &str) -> Value {
    // NULL decodes as Ok(None) for any requested type.
    match row.try_get::<Option<i64>, _>(name) {
        Ok(Some(n)) => return Value::Number(n.into()),
        Ok(None) => return Value::Null,
        Err(_) => {}
    }
    if let Ok(Some(n)) = row.try_get::<Option<u64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(n)) = row.try_get::<Option<f32>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n as f64) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
        return Value::String(d.format("%Y-%m-%d %H:%M:%S").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(name) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(j)) = row.try_get::<Option<Value>, _>(name) {
        return j;
    }
    if let Ok(Some(bytes)) = row.try_get::<Option<Vec<u8>>, _>(name) {
        return Value::String(String::from_utf8_lossy(&bytes).into_owned());
    }
    Value::Null
}
