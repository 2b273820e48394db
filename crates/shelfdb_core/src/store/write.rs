//! Save and delete: keeping the primary table and index tables in step.

use super::{key_cell, Store};
use crate::document::Document;
use crate::error::{CoreError, CoreResult};
use crate::index::index_row;
use crate::schema::{DATA_COLUMN, ID_COLUMN, STORAGE_KEY_COLUMN};
use crate::types::StorageKey;
use shelfdb_codec::encode_fields;
use shelfdb_storage::{Predicate, Row};
use tracing::{debug, trace, warn};

impl Store {
    /// Persists a document and refreshes its index rows.
    ///
    /// An unsaved document is inserted into the primary table and receives
    /// its storage key. A saved one has the row at its storage key
    /// overwritten, id included.
    ///
    /// Then, for each declared index, the row keyed by the document's id is
    /// updated or inserted, provided the document sets every indexed field.
    /// If it does not, that index's existing row is left as it was.
    ///
    /// The writes are independent: a failure part way through leaves the
    /// earlier writes in place.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NoIdentity`] if the document has no id, before any write
    /// - [`CoreError::IndexTableNotFound`] if an index table is missing,
    ///   before any write
    /// - [`CoreError::Codec`] if the fields cannot be encoded
    /// - [`CoreError::Storage`] if the backing store rejects a write
    pub fn save(&mut self, document: &mut Document) -> CoreResult<()> {
        let id = document.id().cloned().ok_or(CoreError::NoIdentity)?;
        self.ensure_index_tables()?;

        let table = self.catalog.table_name();
        let row = Row::new()
            .with(ID_COLUMN, id.as_str())
            .with(DATA_COLUMN, encode_fields(document.fields())?);

        match document.storage_key() {
            Some(key) => {
                let at_key = Predicate::eq(STORAGE_KEY_COLUMN, key_cell(key)?);
                let updated = self.backend.update(table, &at_key, row)?;
                if updated == 0 {
                    warn!(%table, %key, %id, "no primary row to update");
                }
                debug!(%table, %key, %id, "updated document");
            }
            None => {
                let key = StorageKey::new(self.backend.insert(table, row)?);
                document.assign_storage_key(key);
                debug!(%table, %key, %id, "inserted document");
            }
        }

        for entry in self.catalog.entries() {
            let Some(row) = index_row(entry.definition(), &id, document.fields()) else {
                trace!(index = entry.table(), %id, "document lacks indexed fields, skipping");
                continue;
            };

            let by_id = Predicate::eq(ID_COLUMN, id.as_str());
            if self.backend.count(entry.table(), &by_id)? > 0 {
                self.backend.update(entry.table(), &by_id, row)?;
                trace!(index = entry.table(), %id, "updated index row");
            } else {
                self.backend.insert(entry.table(), row)?;
                trace!(index = entry.table(), %id, "inserted index row");
            }
        }
        Ok(())
    }

    /// Removes a document and all of its index rows.
    ///
    /// The primary row is addressed by storage key when the document has
    /// one, by id otherwise. Index rows are then removed by id from every
    /// index table. Deleting a document that is not stored is not an
    /// error.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NoIdentity`] if the document has neither a storage key
    ///   nor an id
    /// - [`CoreError::IndexTableNotFound`] if an index table is missing,
    ///   before any write
    /// - [`CoreError::Storage`] if the backing store rejects a delete
    pub fn delete(&mut self, document: Document) -> CoreResult<()> {
        let primary = match (document.storage_key(), document.id()) {
            (Some(key), _) => Predicate::eq(STORAGE_KEY_COLUMN, key_cell(key)?),
            (None, Some(id)) => Predicate::eq(ID_COLUMN, id.as_str()),
            (None, None) => return Err(CoreError::NoIdentity),
        };
        self.ensure_index_tables()?;

        let table = self.catalog.table_name();
        let deleted = self.backend.delete(table, &primary)?;
        debug!(%table, deleted, "deleted document");

        let Some(id) = document.id() else {
            return Ok(());
        };
        let by_id = Predicate::eq(ID_COLUMN, id.as_str());
        for index in self.catalog.index_tables() {
            let removed = self.backend.delete(index, &by_id)?;
            trace!(%index, %id, removed, "deleted index rows");
        }
        Ok(())
    }
}
