//! Emits one record interface and one input interface per table.

use crate::error::CodegenError;
use crate::schema::{ColumnDescriptor, TableDescriptor};
use std::fmt::Write;

/// Fallback for SQL types with no mapping.
pub const UNTYPED: &str = "any";

/// SQL type keyword -> TypeScript scalar. Lookups ignore case.
#[derive(Clone, Debug)]
pub struct TypeMap {
    entries: Vec<(String, String)>,
}

impl Default for TypeMap {
    fn default() -> Self {
        TypeMap {
            entries: vec![
                ("INT".into(), "number".into()),
                ("VARCHAR".into(), "string".into()),
                ("TEXT".into(), "string".into()),
            ],
        }
    }
}

impl TypeMap {
    /// Add or replace a mapping.
    pub fn with(mut self, sql_type: &str, ts_type: &str) -> Self {
        self.entries.retain(|(k, _)| !k.eq_ignore_ascii_case(sql_type));
        self.entries.push((sql_type.to_ascii_uppercase(), ts_type.to_string()));
        self
    }

    /// Parse a `SQL=ts` pair, as given on the command line.
    pub fn with_spec(self, spec: &str) -> Result<Self, CodegenError> {
        match spec.split_once('=') {
            Some((sql, ts)) if !sql.trim().is_empty() && !ts.trim().is_empty() => {
                Ok(self.with(sql.trim(), ts.trim()))
            }
            _ => Err(CodegenError::Mapping(spec.to_string())),
        }
    }

    pub fn lookup(&self, sql_type: &str) -> &str {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(sql_type))
            .map(|(_, v)| v.as_str())
            .unwrap_or(UNTYPED)
    }
}

/// Uppercase the first letter of each space-separated word.
pub fn capitalize(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn push_shape<'a>(
    out: &mut String,
    name: &str,
    columns: impl Iterator<Item = &'a ColumnDescriptor>,
    types: &TypeMap,
) {
    // Writing into a String cannot fail.
    let _ = writeln!(out, "export interface {} {{", name);
    for c in columns {
        let optional = if c.nullable { "?" } else { "" };
        let _ = writeln!(out, "    {}{}: {};", c.name, optional, types.lookup(&c.declared_type));
    }
    out.push_str("}\n\n");
}

/// Full record shape: every column.
pub fn emit_record(table: &TableDescriptor, types: &TypeMap) -> String {
    let mut out = String::new();
    push_shape(&mut out, &capitalize(&table.name), table.columns.iter(), types);
    out
}

/// Input shape: every column except `id`.
pub fn emit_input(table: &TableDescriptor, types: &TypeMap) -> String {
    let mut out = String::new();
    let name = format!("{}Input", capitalize(&table.name));
    push_shape(&mut out, &name, table.input_columns(), types);
    out
}

/// Record then input shape per table, tables in dump order.
pub fn emit_module(tables: &[TableDescriptor], types: &TypeMap) -> String {
    tables
        .iter()
        .map(|t| format!("{}{}", emit_record(t, types), emit_input(t, types)))
        .collect()
}
