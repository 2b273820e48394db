//! Table store trait definition.

use crate::error::{StorageError, StorageResult};
use crate::row::{Predicate, Row, RowKey};
use crate::schema::TableSchema;

/// A relational backing store for ShelfDB.
///
/// Table stores hold named tables of rows and answer equality queries
/// against them. They know nothing about documents, indexes or the
/// serialized field maps stored in blob columns; ShelfDB owns all of that.
///
/// # Invariants
///
/// - `insert` returns the generated key of the new row. For tables with an
///   auto-increment column this is the column's value; keys are never reused
/// - `select` and `select_join` return rows in ascending key order
/// - Each call is a single statement; there is no atomicity across calls
///   unless the caller brackets them with `begin`/`commit`
/// - Backends must be `Send + Sync`
///
/// # Implementors
///
/// - [`super::InMemoryTableStore`] - For tests and ephemeral stores
pub trait TableStore: Send + Sync {
    /// Creates a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema is invalid or the table already exists.
    fn create_table(&mut self, schema: &TableSchema) -> StorageResult<()>;

    /// Drops a table and all its rows.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::TableNotFound`] if the table does not exist.
    fn drop_table(&mut self, name: &str) -> StorageResult<()>;

    /// Returns true if the table exists.
    fn has_table(&self, name: &str) -> bool;

    /// Inserts a row and returns its generated key.
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not exist, the row names an
    /// undeclared column, or a constraint is violated.
    fn insert(&mut self, table: &str, row: Row) -> StorageResult<RowKey>;

    /// Overwrites `values` on every row matching `predicate`.
    ///
    /// Returns the number of rows updated.
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not exist, a column is undeclared,
    /// or a constraint is violated.
    fn update(&mut self, table: &str, predicate: &Predicate, values: Row)
        -> StorageResult<usize>;

    /// Deletes every row matching `predicate`.
    ///
    /// Returns the number of rows deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not exist or a column is undeclared.
    fn delete(&mut self, table: &str, predicate: &Predicate) -> StorageResult<usize>;

    /// Returns every row matching `predicate`.
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not exist or a column is undeclared.
    fn select(&self, table: &str, predicate: &Predicate) -> StorageResult<Vec<Row>>;

    /// Equality join of `left` and `right` on a column both tables declare.
    ///
    /// `predicate` is evaluated against `right`. Returns one `(left, right)`
    /// pair per joined match, ordered by the left row's key.
    ///
    /// # Errors
    ///
    /// Returns an error if either table does not exist or a column is undeclared.
    fn select_join(
        &self,
        left: &str,
        right: &str,
        on: &str,
        predicate: &Predicate,
    ) -> StorageResult<Vec<(Row, Row)>>;

    /// Counts rows matching `predicate`.
    ///
    /// # Errors
    ///
    /// Same as [`TableStore::select`].
    fn count(&self, table: &str, predicate: &Predicate) -> StorageResult<usize> {
        Ok(self.select(table, predicate)?.len())
    }

    /// Opens a transaction scope.
    ///
    /// # Errors
    ///
    /// The default implementation returns [`StorageError::TransactionsUnsupported`].
    fn begin(&mut self) -> StorageResult<()> {
        Err(StorageError::TransactionsUnsupported)
    }

    /// Makes all writes since `begin` permanent.
    ///
    /// # Errors
    ///
    /// The default implementation returns [`StorageError::TransactionsUnsupported`].
    fn commit(&mut self) -> StorageResult<()> {
        Err(StorageError::TransactionsUnsupported)
    }

    /// Discards all writes since `begin`.
    ///
    /// # Errors
    ///
    /// The default implementation returns [`StorageError::TransactionsUnsupported`].
    fn rollback(&mut self) -> StorageResult<()> {
        Err(StorageError::TransactionsUnsupported)
    }
}
