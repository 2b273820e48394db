//! Shared test vectors for ShelfDB.
//!
//! Vectors are plain serde structs so they can be exported as JSON and
//! checked by other implementations of the same storage layout.

use serde::{Deserialize, Serialize};
use shelfdb_codec::{FieldMap, Value};

/// A field map and its canonical encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMapVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// The document fields.
    pub fields: FieldMap,
    /// Expected encoding (hex-encoded).
    pub expected_hex: String,
}

/// A value and the text stored for it in an index column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexTextVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// The field value.
    pub value: Value,
    /// Expected index column text.
    pub expected: String,
}

/// An index selection case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Declared indexes, in declaration order.
    pub declared: Vec<Vec<String>>,
    /// Fields the query supplies.
    pub requested: Vec<String>,
    /// Fields of the index that should be chosen, or `None`.
    pub expected: Option<Vec<String>>,
}

fn fields(pairs: &[(&str, Value)]) -> FieldMap {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Field map encoding vectors.
pub fn field_map_vectors() -> Vec<FieldMapVector> {
    let vector = |id: &str, description: &str, pairs: &[(&str, Value)], hex: &str| FieldMapVector {
        id: id.into(),
        description: description.into(),
        fields: fields(pairs),
        expected_hex: hex.into(),
    };
    vec![
        vector("fields_empty", "Empty field map", &[], "a0"),
        vector(
            "fields_int",
            "Single integer field",
            &[("foo", Value::Integer(1))],
            "a163666f6f01",
        ),
        vector(
            "fields_text",
            "Single text field",
            &[("foo", Value::from("hi"))],
            "a163666f6f626869",
        ),
        vector(
            "fields_bool_null",
            "Boolean and explicit null",
            &[("a", Value::Bool(true)), ("bb", Value::Null)],
            "a26161f5626262f6",
        ),
        vector(
            "fields_key_order",
            "Shorter keys sort first",
            &[("bb", Value::Integer(2)), ("c", Value::Integer(3))],
            "a261630362626202",
        ),
        vector(
            "fields_array",
            "Array with a negative integer",
            &[("bar", Value::Array(vec![Value::Integer(1), Value::Integer(-1)]))],
            "a163626172820120",
        ),
        vector(
            "fields_float",
            "Floats are 64-bit doubles",
            &[("x", Value::Float(1.5))],
            "a16178fb3ff8000000000000",
        ),
    ]
}

/// Index column text vectors.
pub fn index_text_vectors() -> Vec<IndexTextVector> {
    let vector = |id: &str, value: Value, expected: &str| IndexTextVector {
        id: id.into(),
        value,
        expected: expected.into(),
    };
    vec![
        vector("text_int", Value::Integer(1), "1"),
        vector("text_negative", Value::Integer(-7), "-7"),
        vector("text_true", Value::Bool(true), "true"),
        vector("text_float", Value::Float(2.5), "2.5"),
        vector("text_string", Value::from("hello"), "hello"),
        vector(
            "text_array",
            Value::Array(vec![Value::Integer(1), Value::from("x")]),
            "[1,x]",
        ),
        vector("text_null", Value::Null, ""),
        vector("text_false", Value::Bool(false), ""),
        vector("text_zero", Value::Integer(0), ""),
        vector("text_empty", Value::from(""), ""),
        vector("text_empty_array", Value::Array(vec![]), ""),
    ]
}

/// Index selection vectors.
pub fn selection_vectors() -> Vec<SelectionVector> {
    let declared_fields: [&[&str]; 6] = [
        &["1"],
        &["1", "2"],
        &["2", "3"],
        &["2", "3", "5", "6"],
        &["3", "4"],
        &["3"],
    ];
    let declared: Vec<Vec<String>> = declared_fields.iter().map(|f| strings(f)).collect();

    let cases: [(&str, &[&str], Option<&[&str]>); 8] = [
        ("select_single", &["1"], Some(&["1"][..])),
        ("select_partial", &["1", "3"], Some(&["1"][..])),
        ("select_leftover", &["2", "3", "5"], Some(&["2", "3"][..])),
        ("select_exact", &["2", "3"], Some(&["2", "3"][..])),
        ("select_wide_exact", &["2", "3", "5", "6"], Some(&["2", "3", "5", "6"][..])),
        ("select_none", &["4"], None),
        ("select_superset", &["2", "3", "4", "5", "6", "7"], Some(&["2", "3", "5", "6"][..])),
        ("select_uncovered", &["5"], None),
    ];

    cases
        .iter()
        .map(|(id, requested, expected)| SelectionVector {
            id: (*id).to_string(),
            declared: declared.clone(),
            requested: strings(requested),
            expected: expected.map(strings),
        })
        .collect()
}

/// Encodes bytes as lowercase hex.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decodes a hex string. Panics on malformed input.
pub fn hex_decode(hex: &str) -> Vec<u8> {
    assert!(hex.len() % 2 == 0, "Odd-length hex string: {hex}");
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).expect("Invalid hex digit"))
        .collect()
}

/// All vectors as pretty-printed JSON.
pub fn all_vectors_json() -> String {
    let all = AllVectors {
        field_maps: field_map_vectors(),
        index_text: index_text_vectors(),
        selection: selection_vectors(),
    };
    serde_json::to_string_pretty(&all).expect("Vectors serialize")
}

#[derive(Serialize, Deserialize)]
struct AllVectors {
    field_maps: Vec<FieldMapVector>,
    index_text: Vec<IndexTextVector>,
    selection: Vec<SelectionVector>,
}
