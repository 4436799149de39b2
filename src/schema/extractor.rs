//! Regex-based recovery of `CREATE TABLE` statements from a MySQL dump.
//!
//! Only column definitions are recovered. Key, index and constraint clauses do
//! not match the column pattern and are skipped. Table bodies are captured
//! lazily up to the first `)` that is directly followed by `,` or `;`, so
//! nested parentheses are not balanced.

use crate::error::SchemaError;
use crate::schema::{ColumnDescriptor, TableDescriptor};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

const TABLE_PATTERN: &str = r"CREATE TABLE `([0-9A-Za-z_]+)` \(([\s\S]+?)\)(?:,|;)";
const COLUMN_PATTERN: &str = r"`([0-9A-Za-z_]+)` ([0-9A-Za-z_]+)(?:\(([0-9]+)\))?([^,]*)(?:,|$)";

fn table_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TABLE_PATTERN).expect("table pattern compiles"))
}

fn column_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(COLUMN_PATTERN).expect("column pattern compiles"))
}

/// Parse every `CREATE TABLE` statement in file order. Never fails: input
/// without a recognisable statement yields an empty list.
pub fn parse_dump(dump: &str) -> Vec<TableDescriptor> {
    let tables: Vec<TableDescriptor> = table_regex()
        .captures_iter(dump)
        .map(|caps| TableDescriptor {
            name: caps[1].to_string(),
            columns: parse_columns(&caps[2]),
        })
        .collect();

    if tables.is_empty() {
        tracing::warn!("no CREATE TABLE statements found in schema dump");
    } else {
        tracing::debug!(tables = tables.len(), "parsed schema dump");
    }
    tables
}

fn parse_columns(body: &str) -> Vec<ColumnDescriptor> {
    column_regex()
        .captures_iter(body)
        .map(|caps| {
            let modifiers = caps.get(4).map(|m| m.as_str()).unwrap_or("");
            ColumnDescriptor {
                name: caps[1].to_string(),
                declared_type: caps[2].to_string(),
                length: caps.get(3).and_then(|m| m.as_str().parse().ok()),
                nullable: !modifiers.contains("NOT NULL"),
            }
        })
        .collect()
}

/// Read a dump from disk and parse it.
pub fn load_dump(path: impl AsRef<Path>) -> Result<Vec<TableDescriptor>, SchemaError> {
    let path = path.as_ref();
    let dump = std::fs::read_to_string(path).map_err(|source| SchemaError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_dump(&dump))
}
