//! Index row construction.

use super::IndexDefinition;
use crate::document::DocumentId;
use crate::schema::ID_COLUMN;
use shelfdb_codec::{FieldMap, Value};
use shelfdb_storage::Row;

/// Placeholder stored in an index column for a falsy value.
pub const FALSY_PLACEHOLDER: &str = "";

/// Renders a value for an index column.
///
/// Truthy values use their plain-text rendering. Every falsy value, from
/// `Null` to an empty map, collapses to [`FALSY_PLACEHOLDER`].
#[must_use]
pub fn index_text(value: &Value) -> String {
    if value.is_truthy() {
        value.to_string()
    } else {
        FALSY_PLACEHOLDER.to_string()
    }
}

/// Builds the index row for a document, or `None` if the document lacks
/// any of the definition's fields.
pub(crate) fn index_row(
    definition: &IndexDefinition,
    id: &DocumentId,
    fields: &FieldMap,
) -> Option<Row> {
    let mut row = Row::new().with(ID_COLUMN, id.as_str());
    for field in definition.fields() {
        let value = fields.get(field)?;
        row.set(field.as_str(), index_text(value));
    }
    Some(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfdb_storage::Cell;

    #[test]
    fn truthy_values_render_as_text() {
        assert_eq!(index_text(&Value::Integer(1)), "1");
        assert_eq!(index_text(&Value::from("hi")), "hi");
        assert_eq!(index_text(&Value::Bool(true)), "true");
        assert_eq!(index_text(&Value::Float(2.5)), "2.5");
    }

    #[test]
    fn falsy_values_share_placeholder() {
        for falsy in [
            Value::Null,
            Value::Bool(false),
            Value::Integer(0),
            Value::Float(0.0),
            Value::from(""),
            Value::Array(vec![]),
            Value::Map(FieldMap::new()),
            Value::Bytes(vec![]),
        ] {
            assert_eq!(index_text(&falsy), FALSY_PLACEHOLDER, "{falsy:?}");
        }
    }

    #[test]
    fn integer_and_text_collide() {
        assert_eq!(index_text(&Value::Integer(1)), index_text(&Value::from("1")));
    }

    #[test]
    fn row_requires_every_field() {
        let def = IndexDefinition::from(["foo", "bar"]);
        let id = DocumentId::from_string("abc").unwrap();

        let mut fields = FieldMap::new();
        fields.insert("foo".into(), Value::Integer(1));
        assert!(index_row(&def, &id, &fields).is_none());

        fields.insert("bar".into(), Value::Null);
        let row = index_row(&def, &id, &fields).unwrap();
        assert_eq!(row.get("id"), Some(&Cell::from("abc")));
        assert_eq!(row.get("foo"), Some(&Cell::from("1")));
        assert_eq!(row.get("bar"), Some(&Cell::from("")));
    }
}
