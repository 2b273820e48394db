//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random documents, field maps,
//! index declarations and operation sequences.

use proptest::prelude::*;
use shelfdb_codec::{FieldMap, Value};
use shelfdb_core::{Document, IndexDefinition};

/// Field names drawn by [`field_name_strategy`].
///
/// A small pool, so that generated documents share fields and queries
/// find them.
pub const FIELD_POOL: [&str; 5] = ["foo", "bar", "baz", "qux", "quux"];

/// Strategy for generating field names from [`FIELD_POOL`].
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(FIELD_POOL.to_vec()).prop_map(str::to_string)
}

/// Strategy for generating scalar values, falsy ones included.
pub fn scalar_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-3i64..3).prop_map(Value::Integer),
        any::<i64>().prop_map(Value::Integer),
        any::<f64>()
            .prop_filter("NaN is not encodable", |x| !x.is_nan())
            .prop_map(Value::Float),
        "[a-z]{0,4}".prop_map(Value::Text),
        prop::collection::vec(any::<u8>(), 0..4).prop_map(Value::Bytes),
    ]
}

/// Strategy for generating values, nested arrays and maps included.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_value_strategy().prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4).prop_map(Value::Map),
        ]
    })
}

/// Strategy for generating document field maps.
pub fn field_map_strategy() -> impl Strategy<Value = FieldMap> {
    prop::collection::btree_map(field_name_strategy(), value_strategy(), 0..5)
}

/// Strategy for generating unsaved documents.
pub fn document_strategy() -> impl Strategy<Value = Document> {
    field_map_strategy().prop_map(Document::with_fields)
}

/// Strategy for generating a valid list of index declarations.
///
/// Definitions are non-empty, use distinct fields from [`FIELD_POOL`] and
/// map to distinct tables.
pub fn index_definitions_strategy() -> impl Strategy<Value = Vec<IndexDefinition>> {
    prop::collection::btree_set(prop::collection::btree_set(field_name_strategy(), 1..4), 0..5)
        .prop_map(|sets| sets.into_iter().map(IndexDefinition::new).collect())
}

/// An operation applied to a store in a randomized test.
#[derive(Debug, Clone)]
pub enum DocumentOperation {
    /// Save a new document.
    Insert {
        /// Initial fields.
        fields: FieldMap,
    },
    /// Replace the fields of a saved document and save it again.
    Update {
        /// Which saved document, modulo the number saved.
        slot: usize,
        /// Replacement fields.
        fields: FieldMap,
    },
    /// Delete a saved document.
    Delete {
        /// Which saved document, modulo the number saved.
        slot: usize,
    },
    /// Run a field query.
    Find {
        /// Query parameters.
        fields: FieldMap,
    },
}

/// Strategy for generating document operations.
pub fn document_operation_strategy() -> impl Strategy<Value = DocumentOperation> {
    let query = prop::collection::btree_map(field_name_strategy(), scalar_value_strategy(), 0..3);
    prop_oneof![
        3 => field_map_strategy().prop_map(|fields| DocumentOperation::Insert { fields }),
        2 => (any::<usize>(), field_map_strategy())
            .prop_map(|(slot, fields)| DocumentOperation::Update { slot, fields }),
        1 => any::<usize>().prop_map(|slot| DocumentOperation::Delete { slot }),
        2 => query.prop_map(|fields| DocumentOperation::Find { fields }),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<DocumentOperation>> {
    prop::collection::vec(document_operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfdb_core::{IndexCatalog, RESERVED_COLUMNS};

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn field_names_are_not_reserved(name in field_name_strategy()) {
            prop_assert!(!RESERVED_COLUMNS.contains(&name.as_str()));
        }

        #[test]
        fn generated_values_encode(fields in field_map_strategy()) {
            prop_assert!(shelfdb_codec::encode_fields(&fields).is_ok());
        }

        #[test]
        fn generated_documents_are_unsaved(doc in document_strategy()) {
            prop_assert!(doc.id().is_some());
            prop_assert!(!doc.is_saved());
        }

        #[test]
        fn generated_indexes_form_a_valid_catalog(indexes in index_definitions_strategy()) {
            prop_assert!(IndexCatalog::new("doc", indexes).is_ok());
        }
    }
}
