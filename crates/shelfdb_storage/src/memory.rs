//! In-memory table store.

use crate::backend::TableStore;
use crate::error::{StorageError, StorageResult};
use crate::row::{Cell, Predicate, Row, RowKey};
use crate::schema::{ColumnType, TableSchema};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone)]
struct Table {
    schema: TableSchema,
    rows: BTreeMap<RowKey, Row>,
    next_key: RowKey,
}

impl Table {
    fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            rows: BTreeMap::new(),
            next_key: 1,
        }
    }

    fn name(&self) -> &str {
        &self.schema.name
    }

    fn check_column(&self, column: &str) -> StorageResult<()> {
        if self.schema.get(column).is_none() {
            return Err(StorageError::unknown_column(self.name(), column));
        }
        Ok(())
    }

    fn check_predicate(&self, predicate: &Predicate) -> StorageResult<()> {
        for (column, _) in predicate.clauses() {
            self.check_column(column)?;
        }
        Ok(())
    }

    /// Checks that every populated cell fits its declared column.
    fn check_cells(&self, row: &Row) -> StorageResult<()> {
        for (column, cell) in row.iter() {
            let def = self
                .schema
                .get(column)
                .ok_or_else(|| StorageError::unknown_column(self.name(), column))?;
            let fits = match (def.column_type, cell) {
                (_, Cell::Null) => def.nullable,
                (ColumnType::AutoIncrement | ColumnType::Integer, Cell::Integer(_)) => true,
                (ColumnType::Text, Cell::Text(_)) => true,
                (ColumnType::Blob, Cell::Blob(_)) => true,
                _ => false,
            };
            if !fits {
                return Err(StorageError::constraint(
                    self.name(),
                    format!("column {column} cannot hold {cell}"),
                ));
            }
        }
        Ok(())
    }

    fn check_required(&self, row: &Row) -> StorageResult<()> {
        for def in &self.schema.columns {
            if def.nullable || def.column_type == ColumnType::AutoIncrement {
                continue;
            }
            if row.get(&def.name).map_or(true, Cell::is_null) {
                return Err(StorageError::constraint(
                    self.name(),
                    format!("column {} may not be null", def.name),
                ));
            }
        }
        Ok(())
    }

    /// Rejects `row` if another row (other than `skip`) has the same natural key.
    fn check_unique(&self, row: &Row, skip: Option<RowKey>) -> StorageResult<()> {
        let key_columns: Vec<&str> = self.schema.natural_key().map(|c| c.name.as_str()).collect();
        if key_columns.is_empty() {
            return Ok(());
        }
        let clash = self.rows.iter().any(|(key, existing)| {
            Some(*key) != skip
                && key_columns
                    .iter()
                    .all(|c| existing.get(c).unwrap_or(&Cell::Null) == row.get(c).unwrap_or(&Cell::Null))
        });
        if clash {
            return Err(StorageError::constraint(
                self.name(),
                format!("duplicate primary key ({})", key_columns.join(", ")),
            ));
        }
        Ok(())
    }

    fn matching_keys(&self, predicate: &Predicate) -> Vec<RowKey> {
        // Direct hit when the predicate pins the auto-increment key.
        if let Some(auto) = self.schema.auto_increment() {
            if let Some(Cell::Integer(n)) = predicate.bound(&auto.name) {
                return u64::try_from(*n)
                    .ok()
                    .filter(|k| self.rows.get(k).is_some_and(|r| predicate.matches(r)))
                    .into_iter()
                    .collect();
            }
        }
        self.rows
            .iter()
            .filter(|(_, row)| predicate.matches(row))
            .map(|(key, _)| *key)
            .collect()
    }
}

#[derive(Debug, Default)]
struct Inner {
    tables: HashMap<String, Table>,
    snapshot: Option<HashMap<String, Table>>,
}

impl Inner {
    fn table(&self, name: &str) -> StorageResult<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| StorageError::table_not_found(name))
    }

    fn table_mut(&mut self, name: &str) -> StorageResult<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| StorageError::table_not_found(name))
    }
}

/// An in-memory relational table store.
///
/// This store keeps every table in memory and is suitable for:
/// - Unit and integration tests
/// - Ephemeral document stores that don't need persistence
///
/// Transactions are implemented by snapshotting all tables on `begin`
/// and restoring the snapshot on `rollback`. Only one transaction may be
/// open at a time.
///
/// # Example
///
/// ```rust
/// use shelfdb_storage::{ColumnDef, InMemoryTableStore, Predicate, Row, TableSchema, TableStore};
///
/// let mut store = InMemoryTableStore::new();
/// store
///     .create_table(
///         &TableSchema::new("notes")
///             .column(ColumnDef::auto_increment("key"))
///             .column(ColumnDef::text("title")),
///     )
///     .unwrap();
/// let key = store.insert("notes", Row::new().with("title", "hello")).unwrap();
/// assert_eq!(key, 1);
/// assert_eq!(store.count("notes", &Predicate::all()).unwrap(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryTableStore {
    inner: RwLock<Inner>,
}

impl InMemoryTableStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the names of all tables, sorted.
    #[must_use]
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.read().tables.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns true while a transaction is open.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.inner.read().snapshot.is_some()
    }

    /// Drops every table and any open transaction.
    pub fn clear(&mut self) {
        let mut inner = self.inner.write();
        inner.tables.clear();
        inner.snapshot = None;
    }
}

impl TableStore for InMemoryTableStore {
    fn create_table(&mut self, schema: &TableSchema) -> StorageResult<()> {
        schema.validate()?;
        let mut inner = self.inner.write();
        if inner.tables.contains_key(&schema.name) {
            return Err(StorageError::TableExists {
                name: schema.name.clone(),
            });
        }
        inner
            .tables
            .insert(schema.name.clone(), Table::new(schema.clone()));
        Ok(())
    }

    fn drop_table(&mut self, name: &str) -> StorageResult<()> {
        self.inner
            .write()
            .tables
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StorageError::table_not_found(name))
    }

    fn has_table(&self, name: &str) -> bool {
        self.inner.read().tables.contains_key(name)
    }

    fn insert(&mut self, table: &str, mut row: Row) -> StorageResult<RowKey> {
        let mut inner = self.inner.write();
        let table = inner.table_mut(table)?;
        table.check_cells(&row)?;
        table.check_required(&row)?;
        table.check_unique(&row, None)?;

        let auto = table.schema.auto_increment().map(|c| c.name.clone());
        let supplied = auto
            .as_deref()
            .and_then(|c| row.get(c))
            .and_then(Cell::as_integer)
            .and_then(|n| u64::try_from(n).ok())
            .filter(|n| *n > 0);

        let key = match supplied {
            Some(key) => {
                if table.rows.contains_key(&key) {
                    return Err(StorageError::constraint(
                        table.name(),
                        format!("duplicate key {key}"),
                    ));
                }
                key
            }
            None => table.next_key,
        };
        table.next_key = table.next_key.max(key + 1);

        if let Some(column) = auto {
            let cell = i64::try_from(key).map_err(|_| {
                StorageError::constraint(table.name(), "key space exhausted")
            })?;
            row.set(column, cell);
        }
        table.rows.insert(key, row);
        Ok(key)
    }

    fn update(
        &mut self,
        table: &str,
        predicate: &Predicate,
        values: Row,
    ) -> StorageResult<usize> {
        let mut inner = self.inner.write();
        let table = inner.table_mut(table)?;
        table.check_predicate(predicate)?;
        table.check_cells(&values)?;
        if let Some(auto) = table.schema.auto_increment() {
            if values.get(&auto.name).is_some() {
                return Err(StorageError::constraint(
                    table.name(),
                    format!("column {} is generated and cannot be updated", auto.name),
                ));
            }
        }

        let mut updated = Vec::new();
        for key in table.matching_keys(predicate) {
            let mut row = table.rows[&key].clone();
            for (column, cell) in values.iter() {
                row.set(column, cell.clone());
            }
            table.check_required(&row)?;
            table.check_unique(&row, Some(key))?;
            updated.push((key, row));
        }

        let count = updated.len();
        for (key, row) in updated {
            table.rows.insert(key, row);
        }
        Ok(count)
    }

    fn delete(&mut self, table: &str, predicate: &Predicate) -> StorageResult<usize> {
        let mut inner = self.inner.write();
        let table = inner.table_mut(table)?;
        table.check_predicate(predicate)?;
        let keys = table.matching_keys(predicate);
        for key in &keys {
            table.rows.remove(key);
        }
        Ok(keys.len())
    }

    fn select(&self, table: &str, predicate: &Predicate) -> StorageResult<Vec<Row>> {
        let inner = self.inner.read();
        let table = inner.table(table)?;
        table.check_predicate(predicate)?;
        Ok(table
            .matching_keys(predicate)
            .into_iter()
            .map(|key| table.rows[&key].clone())
            .collect())
    }

    fn select_join(
        &self,
        left: &str,
        right: &str,
        on: &str,
        predicate: &Predicate,
    ) -> StorageResult<Vec<(Row, Row)>> {
        let inner = self.inner.read();
        let left = inner.table(left)?;
        let right = inner.table(right)?;
        left.check_column(on)?;
        right.check_column(on)?;
        right.check_predicate(predicate)?;

        let candidates: Vec<&Row> = right
            .rows
            .values()
            .filter(|row| predicate.matches(row))
            .collect();

        let mut joined = Vec::new();
        for row in left.rows.values() {
            let Some(value) = row.get(on).filter(|c| !c.is_null()) else {
                continue;
            };
            for other in &candidates {
                if other.get(on) == Some(value) {
                    joined.push((row.clone(), (*other).clone()));
                }
            }
        }
        Ok(joined)
    }

    fn count(&self, table: &str, predicate: &Predicate) -> StorageResult<usize> {
        let inner = self.inner.read();
        let table = inner.table(table)?;
        table.check_predicate(predicate)?;
        Ok(table.matching_keys(predicate).len())
    }

    fn begin(&mut self) -> StorageResult<()> {
        let mut inner = self.inner.write();
        if inner.snapshot.is_some() {
            return Err(StorageError::TransactionActive);
        }
        inner.snapshot = Some(inner.tables.clone());
        Ok(())
    }

    fn commit(&mut self) -> StorageResult<()> {
        self.inner
            .write()
            .snapshot
            .take()
            .map(|_| ())
            .ok_or(StorageError::NoActiveTransaction)
    }

    fn rollback(&mut self) -> StorageResult<()> {
        let mut inner = self.inner.write();
        let snapshot = inner
            .snapshot
            .take()
            .ok_or(StorageError::NoActiveTransaction)?;
        inner.tables = snapshot;
        Ok(())
    }
}
