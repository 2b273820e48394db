//! The document store.
//!
//! A [`Store`] owns the index catalog for one document type and a backing
//! [`TableStore`]. It keeps the primary table and every index table in
//! step on save and delete, and answers queries (see [`crate::query`]).
//!
//! Saves and deletes are sequences of independent backing-store writes.
//! Wrap them in [`Store::transaction`] when the backend supports it and
//! the writes must land together.

mod rows;
mod write;

pub(crate) use rows::{decode_document, key_cell};

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::index::IndexCatalog;
use crate::schema::{index_schema, primary_schema};
use shelfdb_storage::TableStore;
use tracing::{debug, warn};

/// Schemaless document storage over a relational backing store.
///
/// # Example
///
/// ```
/// use shelfdb_core::{Config, Document, Query, Store};
/// use shelfdb_storage::InMemoryTableStore;
///
/// let config = Config::new().type_name("Note").index(["foo"]);
/// let mut store = Store::open(config, InMemoryTableStore::new()).unwrap();
///
/// let mut doc = Document::new().with("foo", 1).with("bar", "hi");
/// store.save(&mut doc).unwrap();
///
/// let found = store.find_one(&Query::all().field("foo", 1)).unwrap();
/// assert_eq!(found, Some(doc));
/// ```
pub struct Store {
    pub(crate) catalog: IndexCatalog,
    pub(crate) backend: Box<dyn TableStore>,
}

impl Store {
    /// Opens a store for the configured document type.
    ///
    /// Creates missing tables when `config.create_tables` is set.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] if the configuration is invalid, or a
    /// storage error if table creation fails.
    pub fn open(config: Config, backend: impl TableStore + 'static) -> CoreResult<Self> {
        Self::builder(config).backend(backend).open()
    }

    /// Starts building a store from `config`.
    #[must_use]
    pub fn builder(config: Config) -> StoreBuilder {
        StoreBuilder::new(config)
    }

    /// Returns the index catalog.
    #[must_use]
    pub fn catalog(&self) -> &IndexCatalog {
        &self.catalog
    }

    /// Returns the primary table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        self.catalog.table_name()
    }

    /// Returns the index table names in declaration order.
    #[must_use]
    pub fn index_tables(&self) -> Vec<&str> {
        self.catalog.index_tables().collect()
    }

    /// Returns the backing store.
    #[must_use]
    pub fn backend(&self) -> &dyn TableStore {
        self.backend.as_ref()
    }

    /// Consumes the store and returns the backing store.
    #[must_use]
    pub fn into_backend(self) -> Box<dyn TableStore> {
        self.backend
    }

    /// Creates the primary table and every index table that does not
    /// already exist.
    ///
    /// # Errors
    ///
    /// Returns a storage error if a table cannot be created.
    pub fn create_all(&mut self) -> CoreResult<()> {
        let mut schemas = vec![primary_schema(self.catalog.table_name())];
        schemas.extend(self.catalog.entries().iter().map(index_schema));

        for schema in schemas {
            if self.backend.has_table(&schema.name) {
                continue;
            }
            self.backend.create_table(&schema)?;
            debug!(table = %schema.name, "created table");
        }
        Ok(())
    }

    /// Drops the primary table and every index table that exists.
    ///
    /// # Errors
    ///
    /// Returns a storage error if a table cannot be dropped.
    pub fn drop_all(&mut self) -> CoreResult<()> {
        let tables: Vec<String> = std::iter::once(self.catalog.table_name())
            .chain(self.catalog.index_tables())
            .map(str::to_string)
            .collect();

        for table in tables {
            if !self.backend.has_table(&table) {
                continue;
            }
            self.backend.drop_table(&table)?;
            debug!(%table, "dropped table");
        }
        Ok(())
    }

    /// Runs `f` inside a backing-store transaction.
    ///
    /// Commits if `f` returns `Ok` and rolls back if it returns `Err`. The
    /// closure's error is returned even if the rollback also fails.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or a storage error if the backend
    /// cannot begin or commit (including
    /// [`shelfdb_storage::StorageError::TransactionsUnsupported`]).
    pub fn transaction<F, T>(&mut self, f: F) -> CoreResult<T>
    where
        F: FnOnce(&mut Store) -> CoreResult<T>,
    {
        self.backend.begin()?;
        match f(self) {
            Ok(result) => {
                self.backend.commit()?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback) = self.backend.rollback() {
                    warn!(error = %rollback, "rollback failed");
                }
                Err(e)
            }
        }
    }

    /// Checks that every declared index has its table.
    pub(crate) fn ensure_index_tables(&self) -> CoreResult<()> {
        match self
            .catalog
            .index_tables()
            .find(|table| !self.backend.has_table(table))
        {
            Some(missing) => Err(CoreError::index_table_not_found(missing)),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("table", &self.catalog.table_name())
            .field("indexes", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

/// Builder pairing a [`Config`] with a backing store.
pub struct StoreBuilder {
    config: Config,
    backend: Option<Box<dyn TableStore>>,
}

impl StoreBuilder {
    /// Creates a builder with no backing store.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            backend: None,
        }
    }

    /// Sets the backing store.
    #[must_use]
    pub fn backend(mut self, backend: impl TableStore + 'static) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    /// Sets an already boxed backing store.
    #[must_use]
    pub fn boxed_backend(mut self, backend: Box<dyn TableStore>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Validates the configuration and opens the store.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] if no backing store was given or the
    /// configuration is invalid, or a storage error if table creation
    /// fails. Configuration problems are reported before any table is
    /// touched.
    pub fn open(self) -> CoreResult<Store> {
        let catalog = self.config.validate()?;
        let backend = self
            .backend
            .ok_or_else(|| CoreError::config("no backing store configured"))?;

        let mut store = Store { catalog, backend };
        if self.config.create_tables {
            store.create_all()?;
        }
        debug!(
            table = %store.table_name(),
            indexes = store.catalog.len(),
            "opened store"
        );
        Ok(store)
    }
}
