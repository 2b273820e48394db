//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up in-memory stores
//! and common test scenarios.

use shelfdb_core::{Config, Store};
use shelfdb_storage::InMemoryTableStore;

/// Type name used by the default fixture configuration.
pub const TEST_TYPE: &str = "Doc";

/// The default fixture configuration: type `Doc`, indexed on `(foo)` and
/// `(foo, bar)`.
pub fn test_config() -> Config {
    Config::new()
        .type_name(TEST_TYPE)
        .index(["foo"])
        .index(["foo", "bar"])
}

/// A store over a fresh in-memory backend.
pub struct TestStore {
    /// The store instance.
    pub store: Store,
}

impl TestStore {
    /// Opens a store with the default fixture configuration.
    pub fn memory() -> Self {
        Self::with_config(test_config())
    }

    /// Opens a store with the given configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            store: Store::open(config, InMemoryTableStore::new())
                .expect("Failed to open in-memory store"),
        }
    }

    /// Opens a store with the given index declarations.
    pub fn with_indexes(indexes: &[&[&str]]) -> Self {
        let config = indexes.iter().fold(
            Config::new().type_name(TEST_TYPE).indexes([]),
            |config, fields| config.index(fields.iter().copied()),
        );
        Self::with_config(config)
    }

    /// Returns the number of rows in one of the store's tables.
    pub fn row_count(&self, table: &str) -> usize {
        self.store
            .backend()
            .count(table, &shelfdb_storage::Predicate::all())
            .expect("Failed to count rows")
    }
}

impl std::ops::Deref for TestStore {
    type Target = Store;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl std::ops::DerefMut for TestStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.store
    }
}

/// Runs a test with a temporary in-memory store.
///
/// # Example
///
/// ```
/// use shelfdb_core::{Document, Query};
/// use shelfdb_testkit::with_temp_store;
///
/// with_temp_store(|store| {
///     let mut doc = Document::new().with("foo", 1);
///     store.save(&mut doc).unwrap();
///     assert_eq!(store.count(&Query::all()).unwrap(), 1);
/// });
/// ```
pub fn with_temp_store<F, R>(f: F) -> R
where
    F: FnOnce(&mut Store) -> R,
{
    let mut test_store = TestStore::memory();
    f(&mut test_store.store)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use shelfdb_codec::Value;
    use shelfdb_core::Document;

    /// Three saved documents over the default fixture configuration:
    ///
    /// 1. `{foo: 1, bar: "hi", baz: true}`
    /// 2. `{foo: "hello", bar: "hi", baz: false}`
    /// 3. `{foo: "hello", bar: null, baz: 2}`
    pub fn three_documents() -> (TestStore, Vec<Document>) {
        let mut test_store = TestStore::memory();
        let mut docs = vec![
            Document::new().with("foo", 1).with("bar", "hi").with("baz", true),
            Document::new()
                .with("foo", "hello")
                .with("bar", "hi")
                .with("baz", false),
            Document::new()
                .with("foo", "hello")
                .with("bar", Value::Null)
                .with("baz", 2),
        ];
        for doc in &mut docs {
            test_store.save(doc).expect("Failed to save document");
        }
        (test_store, docs)
    }

    /// A store holding `count` documents, each with an integer `foo`
    /// equal to its position and a `bar` alternating between `"even"` and
    /// `"odd"`.
    pub fn populated_store(count: usize) -> (TestStore, Vec<Document>) {
        let mut test_store = TestStore::memory();
        let docs = (0..count)
            .map(|i| {
                let n = i64::try_from(i).expect("count fits in i64");
                let parity = if i % 2 == 0 { "even" } else { "odd" };
                let mut doc = Document::new().with("foo", n).with("bar", parity);
                test_store.save(&mut doc).expect("Failed to save document");
                doc
            })
            .collect();
        (test_store, docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfdb_core::Query;

    #[test]
    fn memory_store_has_tables() {
        let test_store = TestStore::memory();
        assert_eq!(test_store.table_name(), "doc");
        assert_eq!(test_store.row_count("doc"), 0);
        assert_eq!(test_store.row_count("doc_foo_bar"), 0);
    }

    #[test]
    fn with_indexes_declares_in_order() {
        let test_store = TestStore::with_indexes(&[&["b"], &["a", "b"]]);
        assert_eq!(test_store.index_tables(), vec!["doc_b", "doc_a_b"]);
        assert!(TestStore::with_indexes(&[]).catalog().is_empty());
    }

    #[test]
    fn three_documents_scenario() {
        let (test_store, docs) = scenarios::three_documents();
        assert_eq!(docs.len(), 3);
        assert_eq!(test_store.row_count("doc"), 3);
        assert_eq!(test_store.row_count("doc_foo"), 3);
    }

    #[test]
    fn populated_store_parity() {
        let (test_store, docs) = scenarios::populated_store(5);
        assert_eq!(docs.len(), 5);
        assert_eq!(
            test_store.count(&Query::all().field("bar", "even")).unwrap(),
            3
        );
    }
}
