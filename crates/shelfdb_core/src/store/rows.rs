//! Conversion between documents and primary-table rows.

use crate::document::{Document, DocumentId};
use crate::error::{CoreError, CoreResult};
use crate::schema::{DATA_COLUMN, ID_COLUMN, STORAGE_KEY_COLUMN};
use crate::types::StorageKey;
use shelfdb_codec::decode_fields;
use shelfdb_storage::{Cell, Row};

/// Returns the cell addressing `key` in the storage key column.
pub(crate) fn key_cell(key: StorageKey) -> CoreResult<Cell> {
    i64::try_from(key.as_u64())
        .map(Cell::Integer)
        .map_err(|_| CoreError::invalid_format(format!("{key} is out of range")))
}

/// Rebuilds a saved document from its primary-table row.
pub(crate) fn decode_document(row: &Row) -> CoreResult<Document> {
    let key = row
        .get(STORAGE_KEY_COLUMN)
        .and_then(Cell::as_integer)
        .and_then(|n| u64::try_from(n).ok())
        .map(StorageKey::new)
        .ok_or_else(|| CoreError::invalid_format("row has no storage key"))?;
    let id = row
        .get(ID_COLUMN)
        .and_then(Cell::as_text)
        .and_then(DocumentId::from_string)
        .ok_or_else(|| CoreError::invalid_format(format!("row at {key} has no id")))?;
    let data = row
        .get(DATA_COLUMN)
        .and_then(Cell::as_blob)
        .ok_or_else(|| CoreError::invalid_format(format!("row at {key} has no data")))?;

    Ok(Document::from_stored(key, id, decode_fields(data)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfdb_codec::{encode_fields, FieldMap, Value};

    #[test]
    fn decode_valid_row() {
        let mut fields = FieldMap::new();
        fields.insert("foo".into(), Value::Integer(1));
        let row = Row::new()
            .with(STORAGE_KEY_COLUMN, 3i64)
            .with(ID_COLUMN, "abc")
            .with(DATA_COLUMN, encode_fields(&fields).unwrap());

        let doc = decode_document(&row).unwrap();
        assert_eq!(doc.storage_key(), Some(StorageKey::new(3)));
        assert_eq!(doc.id().map(DocumentId::as_str), Some("abc"));
        assert_eq!(doc.fields(), &fields);
    }

    #[test]
    fn decode_rejects_incomplete_rows() {
        let no_key = Row::new().with(ID_COLUMN, "abc").with(DATA_COLUMN, vec![0xa0u8]);
        assert!(matches!(decode_document(&no_key), Err(CoreError::InvalidFormat { .. })));

        let no_id = Row::new().with(STORAGE_KEY_COLUMN, 1i64).with(DATA_COLUMN, vec![0xa0u8]);
        assert!(matches!(decode_document(&no_id), Err(CoreError::InvalidFormat { .. })));

        let no_data = Row::new().with(STORAGE_KEY_COLUMN, 1i64).with(ID_COLUMN, "abc");
        assert!(matches!(decode_document(&no_data), Err(CoreError::InvalidFormat { .. })));
    }

    #[test]
    fn decode_propagates_codec_errors() {
        let row = Row::new()
            .with(STORAGE_KEY_COLUMN, 1i64)
            .with(ID_COLUMN, "abc")
            .with(DATA_COLUMN, vec![0xffu8]);
        assert!(matches!(decode_document(&row), Err(CoreError::Codec(_))));
    }

    #[test]
    fn key_cell_range() {
        assert_eq!(key_cell(StorageKey::new(5)).unwrap(), Cell::Integer(5));
        assert!(key_cell(StorageKey::new(u64::MAX)).is_err());
    }
}
