//! In-memory descriptors produced by the extractor. Never persisted.

use serde::Serialize;

/// Column name that the server generates; omitted from input shapes.
pub const IDENTITY_COLUMN: &str = "id";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Raw type keyword as written in the dump (e.g. `INT`, `varchar`).
    pub declared_type: String,
    /// Numeric type parameter, e.g. 255 for `VARCHAR(255)`.
    pub length: Option<u32>,
    /// False only when the modifier text contains `NOT NULL`.
    pub nullable: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableDescriptor {
    pub name: String,
    /// Declaration order.
    pub columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns a client supplies on create: everything except `id`.
    pub fn input_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| c.name != IDENTITY_COLUMN)
    }
}
