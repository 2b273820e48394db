//! Query parameters.

use crate::document::DocumentId;
use crate::schema::{ID_COLUMN, STORAGE_KEY_COLUMN};
use crate::types::StorageKey;
use shelfdb_codec::{FieldMap, Value};

/// Equality parameters for [`crate::Store::find`].
///
/// A storage key, when given, wins over everything else. An id is looked
/// up directly and any field parameters filter the result. Field
/// parameters alone go through index selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    storage_key: Option<StorageKey>,
    id: Option<DocumentId>,
    fields: FieldMap,
}

impl Query {
    /// A query with no parameters, matching every document.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Looks up the row at `key`, ignoring every other parameter.
    #[must_use]
    pub fn storage_key(mut self, key: StorageKey) -> Self {
        self.storage_key = Some(key);
        self
    }

    /// Looks up documents with this id.
    #[must_use]
    pub fn id(mut self, id: DocumentId) -> Self {
        self.id = Some(id);
        self
    }

    /// Requires `name` to equal `value`.
    ///
    /// Use [`Value::Null`] to match documents that do not set the field.
    ///
    /// `id` with non-empty text and `storage_key` with a non-negative
    /// integer set the id and storage key parameters instead, so a query
    /// collected from pairs resolves them directly. Any other value under
    /// those names stays a field filter.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match (name.as_str(), &value) {
            (ID_COLUMN, Value::Text(text)) => {
                if let Some(id) = DocumentId::from_string(text.as_str()) {
                    return self.id(id);
                }
            }
            (STORAGE_KEY_COLUMN, Value::Integer(n)) => {
                if let Ok(key) = u64::try_from(*n) {
                    return self.storage_key(StorageKey::new(key));
                }
            }
            _ => {}
        }
        self.fields.insert(name, value);
        self
    }

    /// Returns the storage key parameter.
    #[must_use]
    pub fn key(&self) -> Option<StorageKey> {
        self.storage_key
    }

    /// Returns the id parameter.
    #[must_use]
    pub fn document_id(&self) -> Option<&DocumentId> {
        self.id.as_ref()
    }

    /// Returns the field parameters.
    #[must_use]
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Returns true if the query has no parameters at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage_key.is_none() && self.id.is_none() && self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::all(), |query, (name, value)| query.field(name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_empty() {
        assert!(Query::all().is_empty());
        assert!(!Query::all().field("foo", 1).is_empty());
        assert!(!Query::all().storage_key(StorageKey::new(1)).is_empty());
    }

    #[test]
    fn later_field_wins() {
        let query = Query::all().field("foo", 1).field("foo", 2);
        assert_eq!(query.fields().get("foo"), Some(&Value::Integer(2)));
        assert_eq!(query.fields().len(), 1);
    }

    #[test]
    fn collect_from_pairs() {
        let query: Query = [("foo", 1), ("bar", 2)].into_iter().collect();
        assert_eq!(query.fields().len(), 2);
        assert_eq!(query.key(), None);
        assert_eq!(query.document_id(), None);
    }

    #[test]
    fn reserved_names_set_lookup_parameters() {
        let query: Query = [("id", Value::from("abc")), ("storage_key", Value::Integer(7))]
            .into_iter()
            .collect();
        assert_eq!(query.document_id().map(DocumentId::as_str), Some("abc"));
        assert_eq!(query.key(), Some(StorageKey::new(7)));
        assert!(query.fields().is_empty());
    }

    #[test]
    fn unusable_reserved_values_stay_fields() {
        let query = Query::all().field("id", 5).field("storage_key", -1);
        assert_eq!(query.document_id(), None);
        assert_eq!(query.key(), None);
        assert_eq!(query.fields().len(), 2);
    }
}
