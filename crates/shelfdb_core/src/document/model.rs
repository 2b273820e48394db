//! The schemaless document.

use super::DocumentId;
use crate::types::StorageKey;
use shelfdb_codec::{FieldMap, Value};

/// A schemaless document: an identity plus an open-ended field map.
///
/// A document gets a fresh [`DocumentId`] when it is constructed. Its
/// [`StorageKey`] is absent until the first successful save, after which
/// the store uses it to address the primary-table row directly.
///
/// Unset fields read as `None`, which is distinct from a field explicitly
/// set to [`Value::Null`] or any other falsy value.
///
/// # Equality
///
/// Two documents are equal iff both have an id and the ids match. Field
/// values are not compared, and a document without an id equals nothing,
/// itself included.
#[derive(Debug, Clone)]
pub struct Document {
    id: Option<DocumentId>,
    storage_key: Option<StorageKey>,
    fields: FieldMap,
}

impl Document {
    /// Creates an empty document with a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Some(DocumentId::new()),
            storage_key: None,
            fields: FieldMap::new(),
        }
    }

    /// Creates a document with a fresh id and the given fields.
    pub fn with_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut doc = Self::new();
        for (name, value) in fields {
            doc.fields.insert(name.into(), value.into());
        }
        doc
    }

    /// Rebuilds a document from a primary-table row.
    pub(crate) fn from_stored(storage_key: StorageKey, id: DocumentId, fields: FieldMap) -> Self {
        Self {
            id: Some(id),
            storage_key: Some(storage_key),
            fields,
        }
    }

    /// Sets a field, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Returns the document id.
    #[must_use]
    pub fn id(&self) -> Option<&DocumentId> {
        self.id.as_ref()
    }

    /// Replaces the document id.
    ///
    /// The next save writes the new id to the primary row. Index rows
    /// written under the old id are not touched.
    pub fn set_id(&mut self, id: Option<DocumentId>) {
        self.id = id;
    }

    /// Returns the storage key, if the document has been saved.
    #[must_use]
    pub fn storage_key(&self) -> Option<StorageKey> {
        self.storage_key
    }

    /// Returns true once the document has been saved.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.storage_key.is_some()
    }

    pub(crate) fn assign_storage_key(&mut self, key: StorageKey) {
        self.storage_key = Some(key);
    }

    /// Returns a field's value, or `None` if it was never set.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns true if the field is set, whatever its value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Sets a field and returns its previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    /// Unsets a field and returns its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    /// Returns the field map.
    #[must_use]
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Consumes the document and returns its field map.
    #[must_use]
    pub fn into_fields(self) -> FieldMap {
        self.fields
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_has_id_and_no_key() {
        let doc = Document::new();
        assert!(doc.id().is_some());
        assert_eq!(doc.storage_key(), None);
        assert!(!doc.is_saved());
        assert!(doc.fields().is_empty());
    }

    #[test]
    fn unset_field_reads_none() {
        let doc = Document::with_fields([("foo", 1)]);
        assert_eq!(doc.get("foo"), Some(&Value::Integer(1)));
        assert_eq!(doc.get("bar"), None);
    }

    #[test]
    fn explicit_null_is_distinct_from_unset() {
        let doc = Document::new().with("bar", Value::Null);
        assert!(doc.contains("bar"));
        assert_eq!(doc.get("bar"), Some(&Value::Null));
        assert!(!doc.contains("baz"));
    }

    #[test]
    fn set_and_remove_return_previous() {
        let mut doc = Document::new();
        assert_eq!(doc.set("foo", "a"), None);
        assert_eq!(doc.set("foo", "b"), Some(Value::from("a")));
        assert_eq!(doc.remove("foo"), Some(Value::from("b")));
        assert_eq!(doc.remove("foo"), None);
    }

    #[test]
    fn equality_is_by_id() {
        let a = Document::with_fields([("foo", 1)]);
        let mut b = a.clone();
        b.set("foo", 2);
        assert_eq!(a, b);
        assert_ne!(a, Document::with_fields([("foo", 1)]));
    }

    #[test]
    fn document_without_id_equals_nothing() {
        let mut a = Document::new();
        a.set_id(None);
        let b = a.clone();
        assert_ne!(a, b);
        assert_ne!(a, a.clone());
        assert_ne!(a, Document::new());
    }

    #[test]
    fn set_id_rekeys() {
        let mut doc = Document::new();
        let id = DocumentId::from_string("custom").unwrap();
        doc.set_id(Some(id.clone()));
        assert_eq!(doc.id(), Some(&id));
    }
}
