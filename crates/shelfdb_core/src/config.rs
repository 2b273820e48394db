//! Store configuration.

use crate::error::{CoreError, CoreResult};
use crate::index::{IndexCatalog, IndexDefinition};

/// Configuration for opening a [`crate::Store`].
///
/// Both the document type name and the index declarations are required.
/// An explicitly empty index list is allowed; such a store answers every
/// field query with a full scan.
#[derive(Debug, Clone)]
pub struct Config {
    /// Document type name. The primary table is named after it, lowercased.
    pub type_name: Option<String>,

    /// Declared indexes, in selection tie-break order.
    pub indexes: Option<Vec<IndexDefinition>>,

    /// Whether `open` creates missing tables.
    pub create_tables: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            type_name: None,
            indexes: None,
            create_tables: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the document type name.
    #[must_use]
    pub fn type_name(mut self, name: impl Into<String>) -> Self {
        self.type_name = Some(name.into());
        self
    }

    /// Declares an index over `fields`, after any already declared.
    #[must_use]
    pub fn index<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indexes
            .get_or_insert_with(Vec::new)
            .push(IndexDefinition::new(fields));
        self
    }

    /// Replaces the index declarations.
    ///
    /// Passing an empty iterator declares that the type has no indexes.
    #[must_use]
    pub fn indexes(mut self, indexes: impl IntoIterator<Item = IndexDefinition>) -> Self {
        self.indexes = Some(indexes.into_iter().collect());
        self
    }

    /// Sets whether `open` creates missing tables.
    #[must_use]
    pub const fn create_tables(mut self, value: bool) -> Self {
        self.create_tables = value;
        self
    }

    /// Validates the configuration and builds the index catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] if the type name or index declarations
    /// are missing, or if either is invalid.
    pub fn validate(&self) -> CoreResult<IndexCatalog> {
        let type_name = self
            .type_name
            .as_deref()
            .ok_or_else(|| CoreError::config("no document type name configured"))?;
        let indexes = self
            .indexes
            .as_ref()
            .ok_or_else(|| CoreError::config("no index declarations configured"))?;
        IndexCatalog::new(type_name.to_lowercase(), indexes.iter().cloned())
    }
}
