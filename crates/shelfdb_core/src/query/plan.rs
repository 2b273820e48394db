//! Access path resolution.

use crate::document::DocumentId;
use crate::index::{index_text, IndexCatalog};
use crate::types::StorageKey;
use shelfdb_codec::{FieldMap, Value};
use std::fmt;

use super::Query;

/// How a query reaches the primary table.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessPath {
    /// Direct lookup by storage key.
    StorageKey(StorageKey),
    /// Direct lookup by document id.
    Id(DocumentId),
    /// Join through an index table, matching its columns against the
    /// index text of the query values.
    Index {
        /// Index table name.
        table: String,
        /// Column name to required index text.
        columns: Vec<(String, String)>,
    },
    /// Every row of the primary table.
    FullScan,
}

impl fmt::Display for AccessPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessPath::StorageKey(key) => write!(f, "storage key {key}"),
            AccessPath::Id(id) => write!(f, "id {id}"),
            AccessPath::Index { table, .. } => write!(f, "index {table}"),
            AccessPath::FullScan => f.write_str("full scan"),
        }
    }
}

/// A resolved query: an access path plus the filter applied in memory to
/// each decoded document.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    path: AccessPath,
    residual: FieldMap,
}

impl QueryPlan {
    /// Resolves `query` against `catalog`.
    #[must_use]
    pub fn resolve(catalog: &IndexCatalog, query: &Query) -> Self {
        if let Some(key) = query.key() {
            return Self {
                path: AccessPath::StorageKey(key),
                residual: FieldMap::new(),
            };
        }

        let mut residual = query.fields().clone();
        if let Some(id) = query.document_id() {
            return Self {
                path: AccessPath::Id(id.clone()),
                residual,
            };
        }

        let selected = catalog.select(residual.keys().map(String::as_str));
        let path = match selected {
            Some(entry) => {
                let columns = entry
                    .definition()
                    .fields()
                    .iter()
                    .filter_map(|field| {
                        residual
                            .remove(field)
                            .map(|value| (field.clone(), index_text(&value)))
                    })
                    .collect();
                AccessPath::Index {
                    table: entry.table().to_string(),
                    columns,
                }
            }
            None => AccessPath::FullScan,
        };
        Self { path, residual }
    }

    /// Returns the access path.
    #[must_use]
    pub fn path(&self) -> &AccessPath {
        &self.path
    }

    /// Returns the fields checked in memory after the access path.
    #[must_use]
    pub fn residual(&self) -> &FieldMap {
        &self.residual
    }

    /// Returns true if `fields` satisfies the residual filter.
    ///
    /// An unset field compares as [`Value::Null`]. Values compare by type
    /// and content, so `Integer(1)` does not match `Text("1")`.
    #[must_use]
    pub fn matches(&self, fields: &FieldMap) -> bool {
        self.residual
            .iter()
            .all(|(name, expected)| fields.get(name).unwrap_or(&Value::Null) == expected)
    }
}
