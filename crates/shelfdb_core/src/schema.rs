//! Table layouts for documents and index rows.

use crate::index::IndexEntry;
use shelfdb_storage::{ColumnDef, TableSchema};

/// Auto-increment key column of the primary table.
pub const STORAGE_KEY_COLUMN: &str = "storage_key";

/// Document id column, present in the primary table and every index table.
pub const ID_COLUMN: &str = "id";

/// Serialized field map column of the primary table.
pub const DATA_COLUMN: &str = "data";

/// Column names that index definitions may not use.
pub const RESERVED_COLUMNS: [&str; 3] = [STORAGE_KEY_COLUMN, ID_COLUMN, DATA_COLUMN];

/// Layout of the primary document table.
#[must_use]
pub fn primary_schema(table: &str) -> TableSchema {
    TableSchema::new(table)
        .column(ColumnDef::auto_increment(STORAGE_KEY_COLUMN))
        .column(ColumnDef::text(ID_COLUMN).indexed().not_null())
        .column(ColumnDef::blob(DATA_COLUMN).not_null())
}

/// Layout of an index table: the document id as key plus one text column
/// per indexed field.
#[must_use]
pub fn index_schema(entry: &IndexEntry) -> TableSchema {
    entry.definition().fields().iter().fold(
        TableSchema::new(entry.table()).column(ColumnDef::text(ID_COLUMN).primary_key().not_null()),
        |schema, field| schema.column(ColumnDef::text(field.as_str()).indexed().not_null()),
    )
}
