//! Table schema definitions.

use crate::error::{StorageError, StorageResult};

/// The storage class of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// Integer key generated by the store on insert.
    ///
    /// At most one per table; its value is the [`RowKey`](crate::RowKey)
    /// returned by `insert`.
    AutoIncrement,
    /// Signed 64-bit integer.
    Integer,
    /// UTF-8 text.
    Text,
    /// Opaque bytes.
    Blob,
}

/// A single column declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name, unique within its table.
    pub name: String,
    /// Storage class.
    pub column_type: ColumnType,
    /// Whether the column is part of the table's primary key.
    pub primary_key: bool,
    /// Whether the column carries a lookup index.
    pub indexed: bool,
    /// Whether the column may hold `Cell::Null` (or be omitted on insert).
    pub nullable: bool,
}

impl ColumnDef {
    fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            primary_key: false,
            indexed: false,
            nullable: true,
        }
    }

    /// An auto-incrementing integer key column.
    #[must_use]
    pub fn auto_increment(name: impl Into<String>) -> Self {
        let mut col = Self::new(name, ColumnType::AutoIncrement);
        col.primary_key = true;
        col.nullable = false;
        col
    }

    /// A nullable integer column.
    #[must_use]
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Integer)
    }

    /// A nullable text column.
    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Text)
    }

    /// A nullable blob column.
    #[must_use]
    pub fn blob(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Blob)
    }

    /// Marks the column as part of the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Marks the column as indexed.
    #[must_use]
    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    /// Marks the column as non-nullable.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// A table declaration: a name and an ordered list of columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    /// Table name.
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnDef>,
}

impl TableSchema {
    /// Creates an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Appends a column.
    #[must_use]
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Looks up a column by name.
    pub fn get(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns the auto-increment column, if the table declares one.
    pub fn auto_increment(&self) -> Option<&ColumnDef> {
        self.columns
            .iter()
            .find(|c| c.column_type == ColumnType::AutoIncrement)
    }

    /// Returns the primary key columns that are not auto-generated.
    pub fn natural_key(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns
            .iter()
            .filter(|c| c.primary_key && c.column_type != ColumnType::AutoIncrement)
    }

    /// Checks structural rules: non-empty name, at least one column,
    /// unique column names, at most one auto-increment column.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidSchema`] describing the first problem found.
    pub fn validate(&self) -> StorageResult<()> {
        if self.name.is_empty() {
            return Err(StorageError::invalid_schema("", "table name is empty"));
        }
        if self.columns.is_empty() {
            return Err(StorageError::invalid_schema(&self.name, "no columns"));
        }
        for (i, col) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|c| c.name == col.name) {
                return Err(StorageError::invalid_schema(
                    &self.name,
                    format!("duplicate column {}", col.name),
                ));
            }
        }
        let autos = self
            .columns
            .iter()
            .filter(|c| c.column_type == ColumnType::AutoIncrement)
            .count();
        if autos > 1 {
            return Err(StorageError::invalid_schema(
                &self.name,
                "more than one auto-increment column",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn documents() -> TableSchema {
        TableSchema::new("documents")
            .column(ColumnDef::auto_increment("storage_key"))
            .column(ColumnDef::text("id").indexed().not_null())
            .column(ColumnDef::blob("data").not_null())
    }

    #[test]
    fn builder_keeps_declaration_order() {
        let schema = documents();
        let names: Vec<_> = schema.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["storage_key", "id", "data"]);
    }

    #[test]
    fn auto_increment_is_primary_and_required() {
        let schema = documents();
        let col = schema.auto_increment().unwrap();
        assert_eq!(col.name, "storage_key");
        assert!(col.primary_key);
        assert!(!col.nullable);
        assert_eq!(schema.natural_key().count(), 0);
    }

    #[test]
    fn natural_key_excludes_auto_column() {
        let schema = TableSchema::new("docs_foo")
            .column(ColumnDef::text("id").primary_key().not_null())
            .column(ColumnDef::text("foo").primary_key());
        let keys: Vec<_> = schema.natural_key().map(|c| c.name.as_str()).collect();
        assert_eq!(keys, vec!["id", "foo"]);
    }

    #[test]
    fn validate_rejects_duplicates() {
        let schema = TableSchema::new("t")
            .column(ColumnDef::text("a"))
            .column(ColumnDef::blob("a"));
        assert!(matches!(
            schema.validate(),
            Err(StorageError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn validate_rejects_two_auto_columns() {
        let schema = TableSchema::new("t")
            .column(ColumnDef::auto_increment("a"))
            .column(ColumnDef::auto_increment("b"));
        assert!(schema.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty() {
        assert!(TableSchema::new("t").validate().is_err());
        assert!(TableSchema::new("")
            .column(ColumnDef::text("a"))
            .validate()
            .is_err());
        assert!(documents().validate().is_ok());
    }
}
