//! Index definitions and the per-type catalog.

use crate::error::{CoreError, CoreResult};
use crate::schema::RESERVED_COLUMNS;
use std::collections::BTreeSet;

/// An ordered set of document fields to index together.
///
/// Field order determines the index table's name and column order. Index
/// selection compares definitions as sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexDefinition {
    fields: Vec<String>,
}

impl IndexDefinition {
    /// Creates a definition over the given fields, in order.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the indexed fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns the distinct indexed fields.
    #[must_use]
    pub fn field_set(&self) -> BTreeSet<&str> {
        self.fields.iter().map(String::as_str).collect()
    }

    /// Returns true if `field` is one of the indexed fields.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Returns the number of indexed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the definition names no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the name of this index's table for documents stored in `table`.
    #[must_use]
    pub fn table_name(&self, table: &str) -> String {
        let mut name = table.to_string();
        for field in &self.fields {
            name.push('_');
            name.push_str(field);
        }
        name
    }

    fn validate(&self) -> CoreResult<()> {
        if self.fields.is_empty() {
            return Err(CoreError::config("index definition names no fields"));
        }
        let mut seen = BTreeSet::new();
        for field in &self.fields {
            if field.is_empty() {
                return Err(CoreError::config("index field name is empty"));
            }
            if RESERVED_COLUMNS.contains(&field.as_str()) {
                return Err(CoreError::config(format!(
                    "index field '{field}' is a reserved column name"
                )));
            }
            if !seen.insert(field.as_str()) {
                return Err(CoreError::config(format!(
                    "index field '{field}' is listed twice"
                )));
            }
        }
        Ok(())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for IndexDefinition {
    fn from(fields: [S; N]) -> Self {
        Self::new(fields)
    }
}

/// A declared index together with the name of its backing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    definition: IndexDefinition,
    table: String,
}

impl IndexEntry {
    /// Returns the index definition.
    #[must_use]
    pub fn definition(&self) -> &IndexDefinition {
        &self.definition
    }

    /// Returns the backing table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }
}

/// The ordered index declarations for one document type.
///
/// Built once from a [`crate::Config`] and immutable afterward.
/// Declaration order is preserved and breaks ties during index selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexCatalog {
    table: String,
    entries: Vec<IndexEntry>,
}

impl IndexCatalog {
    /// Builds a catalog for documents stored in `table`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] if the table name is empty, a
    /// definition is empty, repeats a field or uses a reserved column name,
    /// or two definitions map to the same table.
    pub fn new<I>(table: impl Into<String>, definitions: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = IndexDefinition>,
    {
        let table = table.into();
        if table.is_empty() {
            return Err(CoreError::config("document type name is empty"));
        }

        let mut entries: Vec<IndexEntry> = Vec::new();
        for definition in definitions {
            definition.validate()?;
            let index_table = definition.table_name(&table);
            if entries.iter().any(|e| e.table == index_table) {
                return Err(CoreError::config(format!(
                    "index table '{index_table}' is declared twice"
                )));
            }
            entries.push(IndexEntry {
                definition,
                table: index_table,
            });
        }

        Ok(Self { table, entries })
    }

    /// Returns the primary table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Returns the declared indexes in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Iterates over the index definitions in declaration order.
    pub fn definitions(&self) -> impl Iterator<Item = &IndexDefinition> {
        self.entries.iter().map(IndexEntry::definition)
    }

    /// Iterates over the index table names in declaration order.
    pub fn index_tables(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(IndexEntry::table)
    }

    /// Returns the number of declared indexes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no indexes are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the table backing `definition`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IndexTableNotFound`] if the definition is not
    /// declared in this catalog.
    pub fn table_for(&self, definition: &IndexDefinition) -> CoreResult<&str> {
        self.entries
            .iter()
            .find(|e| &e.definition == definition)
            .map(IndexEntry::table)
            .ok_or_else(|| CoreError::index_table_not_found(definition.table_name(&self.table)))
    }

    /// Returns the definition backed by the table `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IndexTableNotFound`] if no declared index uses
    /// that table.
    pub fn by_table(&self, name: &str) -> CoreResult<&IndexDefinition> {
        self.entries
            .iter()
            .find(|e| e.table == name)
            .map(IndexEntry::definition)
            .ok_or_else(|| CoreError::index_table_not_found(name))
    }

    /// Picks the best declared index for a query on `fields`.
    ///
    /// See [`crate::select_index`].
    #[must_use]
    pub fn select<'a, I>(&self, fields: I) -> Option<&IndexEntry>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let requested: BTreeSet<&str> = fields.into_iter().collect();
        super::select_index(self.definitions(), &requested).and_then(|pos| self.entries.get(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(defs: &[&[&str]]) -> CoreResult<IndexCatalog> {
        IndexCatalog::new(
            "doc",
            defs.iter().map(|fields| IndexDefinition::new(fields.iter().copied())),
        )
    }

    #[test]
    fn index_table_names() {
        let cat = catalog(&[&["foo"], &["foo", "bar"]]).unwrap();
        let tables: Vec<_> = cat.index_tables().collect();
        assert_eq!(tables, vec!["doc_foo", "doc_foo_bar"]);
        assert_eq!(cat.table_name(), "doc");
        assert_eq!(cat.len(), 2);
    }

    #[test]
    fn field_order_matters_for_naming() {
        let a = IndexDefinition::from(["foo", "bar"]);
        let b = IndexDefinition::from(["bar", "foo"]);
        assert_ne!(a.table_name("doc"), b.table_name("doc"));
        assert_eq!(a.field_set(), b.field_set());
    }

    #[test]
    fn table_for_and_by_table() {
        let cat = catalog(&[&["foo"], &["foo", "bar"]]).unwrap();
        let def = IndexDefinition::from(["foo", "bar"]);
        assert_eq!(cat.table_for(&def).unwrap(), "doc_foo_bar");
        assert_eq!(cat.by_table("doc_foo").unwrap(), &IndexDefinition::from(["foo"]));

        assert!(matches!(
            cat.by_table("doc_baz"),
            Err(CoreError::IndexTableNotFound { name }) if name == "doc_baz"
        ));
        assert!(matches!(
            cat.table_for(&IndexDefinition::from(["baz"])),
            Err(CoreError::IndexTableNotFound { name }) if name == "doc_baz"
        ));
    }

    #[test]
    fn empty_catalog_is_valid() {
        let cat = catalog(&[]).unwrap();
        assert!(cat.is_empty());
        assert!(cat.select(["foo"]).is_none());
    }

    #[test]
    fn reject_invalid_definitions() {
        assert!(matches!(catalog(&[&[]]), Err(CoreError::Config { .. })));
        assert!(matches!(catalog(&[&[""]]), Err(CoreError::Config { .. })));
        assert!(matches!(catalog(&[&["foo", "foo"]]), Err(CoreError::Config { .. })));
        for reserved in ["storage_key", "id", "data"] {
            assert!(matches!(catalog(&[&[reserved]]), Err(CoreError::Config { .. })));
        }
    }

    #[test]
    fn reject_colliding_tables() {
        assert!(matches!(
            catalog(&[&["foo"], &["foo"]]),
            Err(CoreError::Config { .. })
        ));
        assert!(matches!(
            catalog(&[&["a_b"], &["a", "b"]]),
            Err(CoreError::Config { .. })
        ));
    }

    #[test]
    fn reject_empty_table_name() {
        assert!(matches!(
            IndexCatalog::new("", Vec::new()),
            Err(CoreError::Config { .. })
        ));
    }

    #[test]
    fn select_returns_entry() {
        let cat = catalog(&[&["foo"], &["foo", "bar"]]).unwrap();
        assert_eq!(cat.select(["foo", "bar"]).unwrap().table(), "doc_foo_bar");
        assert_eq!(cat.select(["foo", "baz"]).unwrap().table(), "doc_foo");
        assert!(cat.select(["bar"]).is_none());
    }
}
