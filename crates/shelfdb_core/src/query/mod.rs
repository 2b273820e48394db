//! Queries: equality lookups over documents.
//!
//! A [`Query`] resolves to one [`AccessPath`]:
//!
//! 1. A storage key is looked up directly; other parameters are ignored.
//! 2. Otherwise an id is looked up directly; field parameters filter.
//! 3. Otherwise the best covering index (see [`crate::select_index`])
//!    narrows the rows, and the fields it does not cover filter.
//! 4. With no covering index, every row is scanned and filtered.
//!
//! Index columns hold text, with every falsy value stored as the same
//! empty placeholder. Fields matched through an index are therefore
//! compared by their text form and are not filtered again, so a query for
//! `foo = Null` through an index on `foo` also returns documents whose
//! `foo` is `0`, `false` or empty. Likewise `foo = 1` matches a stored
//! `"1"`. Floats keep their fractional part (`1.0`), so they do not
//! collide with integers.

mod builder;
mod cursor;
mod plan;

pub use builder::Query;
pub use cursor::Cursor;
pub use plan::{AccessPath, QueryPlan};

use crate::document::{Document, DocumentId};
use crate::error::{CoreError, CoreResult};
use crate::store::Store;
use tracing::{debug, warn};

impl Store {
    /// Resolves the access path and residual filter for `query`.
    #[must_use]
    pub fn plan(&self, query: &Query) -> QueryPlan {
        QueryPlan::resolve(&self.catalog, query)
    }

    /// Finds the documents matching `query`.
    ///
    /// Rows are read when the cursor is first advanced. Results come in
    /// the order the backing store returns them; the in-memory store uses
    /// storage key order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IndexTableNotFound`] if the chosen index has no
    /// table. Storage and decoding errors surface through the cursor.
    pub fn find(&self, query: &Query) -> CoreResult<Cursor<'_>> {
        let plan = self.plan(query);
        let table = self.catalog.table_name();

        match plan.path() {
            AccessPath::Index { table: index, .. } if !self.backend.has_table(index) => {
                return Err(CoreError::index_table_not_found(index.as_str()));
            }
            AccessPath::FullScan if !plan.residual().is_empty() => {
                warn!(
                    %table,
                    fields = ?plan.residual().keys().collect::<Vec<_>>(),
                    "no index covers query, scanning"
                );
            }
            _ => {}
        }
        debug!(%table, path = %plan.path(), residual = plan.residual().len(), "query");

        Ok(Cursor::new(self.backend.as_ref(), table, plan))
    }

    /// Returns the first document matching `query`, if any.
    ///
    /// # Errors
    ///
    /// Same as [`Store::find`], plus any error reading the first match.
    pub fn find_one(&self, query: &Query) -> CoreResult<Option<Document>> {
        self.find(query)?.next().transpose()
    }

    /// Counts the documents matching `query`.
    ///
    /// # Errors
    ///
    /// Same as [`Store::find`], plus any error reading a match.
    pub fn count(&self, query: &Query) -> CoreResult<usize> {
        self.find(query)?.try_fold(0, |n, doc| doc.map(|_| n + 1))
    }

    /// Returns the document with the given id, if stored.
    ///
    /// # Errors
    ///
    /// Same as [`Store::find_one`].
    pub fn get(&self, id: &DocumentId) -> CoreResult<Option<Document>> {
        self.find_one(&Query::all().id(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::types::StorageKey;
    use shelfdb_codec::Value;
    use shelfdb_storage::InMemoryTableStore;

    fn store() -> Store {
        let config = Config::new()
            .type_name("Doc")
            .index(["foo"])
            .index(["foo", "bar"]);
        Store::open(config, InMemoryTableStore::new()).unwrap()
    }

    /// Three documents saved in order, indexed on `(foo)` and `(foo, bar)`.
    fn scenario() -> (Store, [Document; 3]) {
        let mut store = store();
        let mut first = Document::new().with("foo", 1).with("bar", "hi").with("baz", true);
        let mut second = Document::new()
            .with("foo", "hello")
            .with("bar", "hi")
            .with("baz", false);
        let mut third = Document::new()
            .with("foo", "hello")
            .with("bar", Value::Null)
            .with("baz", 2);
        for doc in [&mut first, &mut second, &mut third] {
            store.save(doc).unwrap();
        }
        (store, [first, second, third])
    }

    fn found(store: &Store, query: &Query) -> Vec<Document> {
        store.find(query).unwrap().collect::<CoreResult<_>>().unwrap()
    }

    #[test]
    fn scenario_queries() {
        let (store, [first, second, third]) = scenario();

        assert_eq!(found(&store, &Query::all().field("foo", 1)), vec![first.clone()]);
        assert_eq!(
            found(&store, &Query::all().field("bar", "hi")),
            vec![first.clone(), second.clone()]
        );
        assert_eq!(
            found(&store, &Query::all().field("bar", Value::Null)),
            vec![third.clone()]
        );
        assert_eq!(
            found(&store, &Query::all().field("foo", 1).field("bar", "hi")),
            vec![first.clone()]
        );
        assert_eq!(found(&store, &Query::all()), vec![first, second, third]);
    }

    #[test]
    fn scenario_access_paths() {
        let (store, _) = scenario();
        assert!(matches!(
            store.plan(&Query::all().field("foo", 1)).path(),
            AccessPath::Index { table, .. } if table == "doc_foo"
        ));
        assert!(matches!(
            store.plan(&Query::all().field("foo", 1).field("bar", "hi")).path(),
            AccessPath::Index { table, .. } if table == "doc_foo_bar"
        ));
        assert_eq!(
            store.plan(&Query::all().field("bar", "hi")).path(),
            &AccessPath::FullScan
        );
    }

    #[test]
    fn roundtrip_by_id() {
        let (store, [first, ..]) = scenario();
        let results = found(&store, &Query::all().id(first.id().unwrap().clone()));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0], first);
        assert_eq!(results[0].fields(), first.fields());
        assert_eq!(results[0].storage_key(), first.storage_key());
    }

    #[test]
    fn id_lookup_applies_residual() {
        let (store, [first, ..]) = scenario();
        let id = first.id().unwrap().clone();
        assert_eq!(store.count(&Query::all().id(id.clone()).field("foo", 1)).unwrap(), 1);
        assert_eq!(store.count(&Query::all().id(id).field("foo", 2)).unwrap(), 0);
    }

    #[test]
    fn storage_key_bypasses_filters() {
        let (store, [first, ..]) = scenario();
        let key = first.storage_key().unwrap();
        let results = found(&store, &Query::all().storage_key(key).field("foo", "ignored"));
        assert_eq!(results, vec![first]);
    }

    #[test]
    fn unknown_storage_key_finds_nothing() {
        let (store, _) = scenario();
        assert_eq!(store.count(&Query::all().storage_key(StorageKey::new(99))).unwrap(), 0);
        assert_eq!(
            store.count(&Query::all().storage_key(StorageKey::new(u64::MAX))).unwrap(),
            0
        );
    }

    #[test]
    fn full_scan_filters_in_memory() {
        let (store, [_, second, _]) = scenario();
        assert_eq!(found(&store, &Query::all().field("baz", false)), vec![second]);
        assert!(found(&store, &Query::all().field("baz", 0)).is_empty());
        assert!(found(&store, &Query::all().field("missing", 1)).is_empty());
    }

    #[test]
    fn absent_field_matches_null() {
        let mut store = store();
        let mut bare = Document::new().with("other", 1);
        store.save(&mut bare).unwrap();
        assert_eq!(found(&store, &Query::all().field("bar", Value::Null)), vec![bare]);
    }

    #[test]
    fn index_match_uses_text_form() {
        let (store, [first, ..]) = scenario();
        // `1` and `"1"` share an index text, and indexed fields are not
        // filtered again.
        assert_eq!(found(&store, &Query::all().field("foo", "1")), vec![first]);
    }

    #[test]
    fn floats_do_not_match_integers_through_index() {
        let mut store = store();
        let mut float = Document::new().with("foo", 1.0);
        store.save(&mut float).unwrap();
        assert_eq!(store.count(&Query::all().field("foo", 1)).unwrap(), 0);
        assert_eq!(found(&store, &Query::all().field("foo", 1.0)), vec![float]);
    }

    #[test]
    fn id_pair_resolves_by_id() {
        let (store, [first, ..]) = scenario();
        let id = first.id().unwrap().as_str().to_string();
        let query: Query = [("id", Value::from(id))].into_iter().collect();
        assert!(matches!(store.plan(&query).path(), AccessPath::Id(_)));
        assert_eq!(found(&store, &query), vec![first]);
    }

    #[test]
    fn falsy_values_collide_through_index() {
        let mut store = store();
        let mut zero = Document::new().with("foo", 0);
        let mut null = Document::new().with("foo", Value::Null);
        let mut unset = Document::new().with("bar", 1);
        for doc in [&mut zero, &mut null, &mut unset] {
            store.save(doc).unwrap();
        }
        assert_eq!(
            found(&store, &Query::all().field("foo", Value::Null)),
            vec![zero, null]
        );
    }

    #[test]
    fn updated_document_is_found_by_new_value() {
        let (mut store, [mut first, ..]) = scenario();
        first.set("foo", "woot");
        store.save(&mut first).unwrap();

        assert!(found(&store, &Query::all().field("foo", 1)).is_empty());
        let results = found(&store, &Query::all().field("foo", "woot"));
        assert_eq!(results, vec![first]);
        assert_eq!(results[0].get("foo"), Some(&Value::from("woot")));
    }

    #[test]
    fn stale_index_row_still_matches() {
        let (mut store, [mut first, ..]) = scenario();
        first.remove("foo");
        store.save(&mut first).unwrap();

        // The `(foo)` row still holds "1"; the document no longer sets foo.
        let results = found(&store, &Query::all().field("foo", 1));
        assert_eq!(results, vec![first]);
        assert_eq!(results[0].get("foo"), None);
    }

    #[test]
    fn delete_completeness() {
        let (mut store, [first, second, third]) = scenario();
        let id = first.id().unwrap().clone();
        store.delete(first).unwrap();

        assert_eq!(found(&store, &Query::all()), vec![second, third]);
        assert_eq!(store.get(&id).unwrap(), None);
        for table in store.index_tables() {
            let by_id = shelfdb_storage::Predicate::eq("id", id.as_str());
            assert_eq!(store.backend().count(table, &by_id).unwrap(), 0, "{table}");
        }
    }

    #[test]
    fn find_one_and_count() {
        let (store, [first, ..]) = scenario();
        assert_eq!(store.find_one(&Query::all().field("bar", "hi")).unwrap(), Some(first));
        assert_eq!(store.find_one(&Query::all().field("foo", 42)).unwrap(), None);
        assert_eq!(store.count(&Query::all()).unwrap(), 3);
        assert_eq!(store.count(&Query::all().field("foo", "hello")).unwrap(), 2);
    }

    #[test]
    fn get_by_id() {
        let (store, [_, second, _]) = scenario();
        let got = store.get(second.id().unwrap()).unwrap().unwrap();
        assert_eq!(got, second);
        assert_eq!(store.get(&DocumentId::new()).unwrap(), None);
    }

    #[test]
    fn cursor_is_lazy_and_not_restartable() {
        let (mut store, _) = scenario();
        let mut doc = Document::new().with("foo", 1);
        store.save(&mut doc).unwrap();

        let mut cursor = store.find(&Query::all()).unwrap();
        assert_eq!(cursor.by_ref().count(), 4);
        assert!(cursor.next().is_none());
        assert_eq!(store.find(&Query::all()).unwrap().count(), 4);
    }

    #[test]
    fn missing_index_table_fails_find() {
        let (mut store, _) = scenario();
        store.backend.drop_table("doc_foo").unwrap();
        assert!(matches!(
            store.find(&Query::all().field("foo", 1)),
            Err(CoreError::IndexTableNotFound { name }) if name == "doc_foo"
        ));
        assert_eq!(store.count(&Query::all()).unwrap(), 3);
    }

    #[test]
    fn missing_primary_table_surfaces_through_cursor() {
        let (mut store, _) = scenario();
        store.backend.drop_table("doc").unwrap();
        let mut cursor = store.find(&Query::all()).unwrap();
        assert!(matches!(cursor.next(), Some(Err(CoreError::Storage(_)))));
        assert!(cursor.next().is_none());
    }

    #[test]
    fn store_without_indexes_scans() {
        let config = Config::new().type_name("Doc").indexes([]);
        let mut store = Store::open(config, InMemoryTableStore::new()).unwrap();
        let mut doc = Document::new().with("foo", 1);
        store.save(&mut doc).unwrap();
        assert_eq!(store.plan(&Query::all().field("foo", 1)).path(), &AccessPath::FullScan);
        assert_eq!(found(&store, &Query::all().field("foo", 1)), vec![doc]);
    }
}
