//! Cross-crate integration test helpers.
//!
//! [`IntegrationHarness`] drives a store while tracking what it should
//! contain, and checks the primary table, the index tables and query
//! results against that model.

use crate::fixtures::TestStore;
use crate::generators::DocumentOperation;
use shelfdb_codec::FieldMap;
use shelfdb_core::{index_text, AccessPath, CoreResult, Document, Query, ID_COLUMN};
use shelfdb_storage::{Cell, Predicate};
use tracing::debug;

/// A test harness for integration testing.
pub struct IntegrationHarness {
    /// The store under test.
    pub store: TestStore,
    /// Saved documents, in storage key order.
    documents: Vec<Document>,
}

impl IntegrationHarness {
    /// Creates a harness over the default fixture store.
    pub fn new() -> Self {
        Self::with_store(TestStore::memory())
    }

    /// Creates a harness over an empty store.
    pub fn with_store(store: TestStore) -> Self {
        assert_eq!(
            store.count(&Query::all()).expect("Failed to count documents"),
            0,
            "Harness needs an empty store"
        );
        Self {
            store,
            documents: Vec::new(),
        }
    }

    /// Saves a new document and tracks it.
    pub fn insert(&mut self, fields: FieldMap) -> Document {
        let mut doc = Document::with_fields(fields);
        self.store.save(&mut doc).expect("Failed to save document");
        self.documents.push(doc.clone());
        doc
    }

    /// Replaces the fields of a tracked document and saves it again.
    ///
    /// `slot` wraps around the tracked documents. Returns `None` if nothing
    /// is tracked.
    pub fn update(&mut self, slot: usize, fields: FieldMap) -> Option<Document> {
        if self.documents.is_empty() {
            return None;
        }
        let slot = slot % self.documents.len();
        let doc = &mut self.documents[slot];

        let old: Vec<String> = doc.fields().keys().cloned().collect();
        for name in old {
            doc.remove(&name);
        }
        for (name, value) in fields {
            doc.set(name, value);
        }
        let key = doc.storage_key();
        self.store.save(doc).expect("Failed to update document");
        assert_eq!(doc.storage_key(), key, "Update must keep the storage key");
        Some(doc.clone())
    }

    /// Deletes a tracked document.
    ///
    /// `slot` wraps around the tracked documents. Returns `None` if nothing
    /// is tracked.
    pub fn delete(&mut self, slot: usize) -> Option<Document> {
        if self.documents.is_empty() {
            return None;
        }
        let doc = self.documents.remove(slot % self.documents.len());
        self.store
            .delete(doc.clone())
            .expect("Failed to delete document");
        Some(doc)
    }

    /// Applies one generated operation, verifying query results.
    pub fn apply(&mut self, operation: &DocumentOperation) {
        debug!(?operation, tracked = self.documents.len(), "applying operation");
        match operation {
            DocumentOperation::Insert { fields } => {
                self.insert(fields.clone());
            }
            DocumentOperation::Update { slot, fields } => {
                self.update(*slot, fields.clone());
            }
            DocumentOperation::Delete { slot } => {
                self.delete(*slot);
            }
            DocumentOperation::Find { fields } => {
                self.find_and_verify(fields);
            }
        }
    }

    /// Runs a field query and checks the results against the model.
    ///
    /// Results must come in storage key order and be tracked documents
    /// with their current fields. A document that sets every field of the
    /// chosen index is returned iff its index text and residual fields
    /// match. A document that lacks one of them may still be reached
    /// through a stale index row, but only if its residual fields match.
    pub fn find_and_verify(&self, fields: &FieldMap) -> Vec<Document> {
        let query: Query = fields.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        let plan = self.store.plan(&query);
        let results: Vec<Document> = self
            .store
            .find(&query)
            .expect("Failed to run query")
            .collect::<CoreResult<_>>()
            .expect("Failed to read results");

        for pair in results.windows(2) {
            assert!(
                pair[0].storage_key() < pair[1].storage_key(),
                "Results out of storage key order"
            );
        }
        for found in &results {
            let tracked = self
                .documents
                .iter()
                .find(|doc| *doc == found)
                .unwrap_or_else(|| panic!("Query returned untracked document {:?}", found.id()));
            assert_eq!(found.fields(), tracked.fields(), "Field mismatch for {:?}", found.id());
        }

        let columns: &[(String, String)] = match plan.path() {
            AccessPath::Index { columns, .. } => columns,
            _ => &[],
        };
        for doc in &self.documents {
            let returned = results.contains(doc);
            let fresh = columns.iter().all(|(field, _)| doc.contains(field));
            if fresh {
                let index_match = columns
                    .iter()
                    .all(|(field, text)| doc.get(field).map(index_text).as_ref() == Some(text));
                assert_eq!(
                    returned,
                    index_match && plan.matches(doc.fields()),
                    "Wrong membership for {:?} under {}",
                    doc.id(),
                    plan.path()
                );
            } else if returned {
                assert!(plan.matches(doc.fields()), "Stale match ignored residual");
            }
        }
        results
    }

    /// Verifies every tracked document reads back with its fields, and
    /// that nothing else is stored.
    pub fn verify_all(&self) {
        for doc in &self.documents {
            let id = doc.id().expect("Tracked documents have ids");
            let stored = self
                .store
                .get(id)
                .expect("Failed to get document")
                .unwrap_or_else(|| panic!("Document {id} missing"));
            assert_eq!(stored.fields(), doc.fields(), "Field mismatch for {id}");
            assert_eq!(stored.storage_key(), doc.storage_key());
        }
        assert_eq!(
            self.store.row_count(self.store.table_name()),
            self.documents.len(),
            "Primary table holds untracked rows"
        );
    }

    /// Verifies index tables hold rows only for tracked documents, and a
    /// current row for every document that sets all of an index's fields.
    pub fn verify_index_rows(&self) {
        let backend = self.store.backend();
        for entry in self.store.catalog().entries() {
            let rows = backend
                .select(entry.table(), &Predicate::all())
                .expect("Failed to read index table");
            for row in &rows {
                let id = row.get(ID_COLUMN).and_then(Cell::as_text);
                assert!(
                    self.documents
                        .iter()
                        .any(|doc| doc.id().map(|d| d.as_str()) == id),
                    "{} holds a row for untracked id {id:?}",
                    entry.table()
                );
            }

            let fields = entry.definition().fields();
            for doc in &self.documents {
                if !fields.iter().all(|f| doc.contains(f)) {
                    continue;
                }
                let id = doc.id().expect("Tracked documents have ids");
                let by_id = Predicate::eq(ID_COLUMN, id.as_str());
                let rows = backend.select(entry.table(), &by_id).expect("Failed to read index table");
                assert_eq!(rows.len(), 1, "{} should hold one row for {id}", entry.table());
                for field in fields {
                    let expected = doc.get(field).map(index_text);
                    assert_eq!(
                        rows[0].get(field).and_then(Cell::as_text),
                        expected.as_deref(),
                        "{}.{field} is stale for {id}",
                        entry.table()
                    );
                }
            }
        }
    }

    /// Returns the count of tracked documents.
    pub fn tracked_count(&self) -> usize {
        self.documents.len()
    }

    /// Returns the tracked documents in storage key order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }
}

impl Default for IntegrationHarness {
    fn default() -> Self {
        Self::new()
    }
}
