//! Canonical CBOR encoder.

use crate::error::{CodecError, CodecResult};
use crate::value::{FieldMap, Value};

/// Encode a value to canonical CBOR bytes.
///
/// Output is deterministic (RFC 8949 Section 4.2.1):
/// - Map keys are sorted by their encoded form (length-first, then bytewise)
/// - Integers use the shortest possible encoding
/// - Floats are always written as 64-bit doubles
/// - No indefinite-length encoding
///
/// # Errors
///
/// Returns [`CodecError::NaNForbidden`] if the value contains a NaN float.
pub fn to_canonical_cbor(value: &Value) -> CodecResult<Vec<u8>> {
    let mut encoder = CanonicalEncoder::new();
    encoder.encode(value)?;
    Ok(encoder.into_bytes())
}

/// Encode a document field map as a canonical CBOR map.
///
/// # Errors
///
/// Returns [`CodecError::NaNForbidden`] if any field holds a NaN float.
pub fn encode_fields(fields: &FieldMap) -> CodecResult<Vec<u8>> {
    let mut encoder = CanonicalEncoder::new();
    encoder.encode_map(fields)?;
    Ok(encoder.into_bytes())
}

/// A canonical CBOR encoder.
#[derive(Debug, Default)]
pub struct CanonicalEncoder {
    buffer: Vec<u8>,
}

impl CanonicalEncoder {
    /// Create a new encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode a value.
    pub fn encode(&mut self, value: &Value) -> CodecResult<()> {
        match value {
            Value::Null => self.buffer.push(0xf6),
            Value::Bool(b) => self.buffer.push(if *b { 0xf5 } else { 0xf4 }),
            Value::Integer(n) => self.encode_integer(*n),
            Value::Float(x) => self.encode_float(*x)?,
            Value::Text(s) => self.encode_text(s),
            Value::Bytes(b) => {
                self.encode_head(2, b.len() as u64);
                self.buffer.extend_from_slice(b);
            }
            Value::Array(items) => {
                self.encode_head(4, items.len() as u64);
                for item in items {
                    self.encode(item)?;
                }
            }
            Value::Map(entries) => self.encode_map(entries)?,
        }
        Ok(())
    }

    /// Consume this encoder and return the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    #[allow(clippy::cast_sign_loss)]
    fn encode_integer(&mut self, n: i64) {
        if n >= 0 {
            self.encode_head(0, n as u64);
        } else {
            // -1 - n is in [0, 2^63 - 1] for every negative i64
            self.encode_head(1, (-1 - n) as u64);
        }
    }

    fn encode_float(&mut self, x: f64) -> CodecResult<()> {
        if x.is_nan() {
            return Err(CodecError::NaNForbidden);
        }
        self.buffer.push(0xfb);
        self.buffer.extend_from_slice(&x.to_bits().to_be_bytes());
        Ok(())
    }

    fn encode_text(&mut self, text: &str) {
        self.encode_head(3, text.len() as u64);
        self.buffer.extend_from_slice(text.as_bytes());
    }

    #[allow(clippy::cast_possible_truncation)]
    fn encode_head(&mut self, major_type: u8, value: u64) {
        let mt = major_type << 5;

        if value < 24 {
            self.buffer.push(mt | (value as u8));
        } else if value <= u64::from(u8::MAX) {
            self.buffer.push(mt | 24);
            self.buffer.push(value as u8);
        } else if value <= u64::from(u16::MAX) {
            self.buffer.push(mt | 25);
            self.buffer.extend_from_slice(&(value as u16).to_be_bytes());
        } else if value <= u64::from(u32::MAX) {
            self.buffer.push(mt | 26);
            self.buffer.extend_from_slice(&(value as u32).to_be_bytes());
        } else {
            self.buffer.push(mt | 27);
            self.buffer.extend_from_slice(&value.to_be_bytes());
        }
    }

    fn encode_map(&mut self, entries: &FieldMap) -> CodecResult<()> {
        // Text keys encode as head + UTF-8, so canonical order is
        // shorter keys first, then bytewise.
        let mut keys: Vec<&String> = entries.keys().collect();
        keys.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.as_bytes().cmp(b.as_bytes())));

        self.encode_head(5, entries.len() as u64);
        for key in keys {
            self.encode_text(key);
            self.encode(&entries[key])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, Value)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn encode_simple_values() {
        assert_eq!(to_canonical_cbor(&Value::Null).unwrap(), vec![0xf6]);
        assert_eq!(to_canonical_cbor(&Value::Bool(false)).unwrap(), vec![0xf4]);
        assert_eq!(to_canonical_cbor(&Value::Bool(true)).unwrap(), vec![0xf5]);
    }

    #[test]
    fn encode_integer_widths() {
        assert_eq!(to_canonical_cbor(&Value::Integer(23)).unwrap(), vec![0x17]);
        assert_eq!(
            to_canonical_cbor(&Value::Integer(255)).unwrap(),
            vec![0x18, 255]
        );
        assert_eq!(
            to_canonical_cbor(&Value::Integer(256)).unwrap(),
            vec![0x19, 0x01, 0x00]
        );
        assert_eq!(
            to_canonical_cbor(&Value::Integer(65536)).unwrap(),
            vec![0x1a, 0x00, 0x01, 0x00, 0x00]
        );
        assert_eq!(to_canonical_cbor(&Value::Integer(-1)).unwrap(), vec![0x20]);
        assert_eq!(
            to_canonical_cbor(&Value::Integer(-100)).unwrap(),
            vec![0x38, 99]
        );
    }

    #[test]
    fn encode_extreme_integers() {
        let max = to_canonical_cbor(&Value::Integer(i64::MAX)).unwrap();
        assert_eq!(max[0], 0x1b);
        assert_eq!(max.len(), 9);
        let min = to_canonical_cbor(&Value::Integer(i64::MIN)).unwrap();
        assert_eq!(min[0], 0x3b);
        assert_eq!(&min[1..], &(i64::MAX as u64).to_be_bytes());
    }

    #[test]
    fn encode_float_as_double() {
        assert_eq!(
            to_canonical_cbor(&Value::Float(1.5)).unwrap(),
            vec![0xfb, 0x3f, 0xf8, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn reject_nan() {
        assert_eq!(
            to_canonical_cbor(&Value::Float(f64::NAN)),
            Err(CodecError::NaNForbidden)
        );
        let nested = Value::Array(vec![Value::Float(f64::NAN)]);
        assert!(to_canonical_cbor(&nested).is_err());
    }

    #[test]
    fn encode_text_and_bytes() {
        assert_eq!(
            to_canonical_cbor(&Value::Text("a".into())).unwrap(),
            vec![0x61, b'a']
        );
        assert_eq!(
            to_canonical_cbor(&Value::Bytes(vec![1, 2, 3])).unwrap(),
            vec![0x43, 1, 2, 3]
        );
    }

    #[test]
    fn field_map_keys_are_length_first() {
        let bytes = encode_fields(&fields(&[
            ("bb", Value::Integer(2)),
            ("c", Value::Integer(3)),
            ("a", Value::Integer(1)),
        ]))
        .unwrap();
        assert_eq!(
            bytes,
            vec![0xa3, 0x61, b'a', 0x01, 0x61, b'c', 0x03, 0x62, b'b', b'b', 0x02]
        );
    }

    #[test]
    fn empty_field_map() {
        assert_eq!(encode_fields(&FieldMap::new()).unwrap(), vec![0xa0]);
    }
}
