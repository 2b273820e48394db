//! Canonical CBOR decoder.

use crate::error::{CodecError, CodecResult};
use crate::value::{FieldMap, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Maximum allowed element count for arrays and maps.
const MAX_CONTAINER_ELEMENTS: u64 = 16 * 1024 * 1024;

/// Maximum allowed byte/string length.
const MAX_BYTES_LENGTH: u64 = 256 * 1024 * 1024;

/// Maximum nesting depth of arrays and maps.
const MAX_DEPTH: usize = 128;

/// Decode a single value from CBOR bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not canonical CBOR, contain
/// constructs the encoder never produces, or have trailing bytes.
pub fn from_cbor(bytes: &[u8]) -> CodecResult<Value> {
    let mut decoder = CanonicalDecoder::new(bytes);
    let value = decoder.decode()?;
    decoder.finish()?;
    Ok(value)
}

/// Decode a document field map written by [`encode_fields`](crate::encode_fields).
///
/// # Errors
///
/// Same as [`from_cbor`], plus [`CodecError::InvalidStructure`] if the
/// top-level item is not a map.
pub fn decode_fields(bytes: &[u8]) -> CodecResult<FieldMap> {
    match from_cbor(bytes)? {
        Value::Map(fields) => Ok(fields),
        other => Err(CodecError::invalid_structure(format!(
            "expected a field map, found {}",
            other.type_name()
        ))),
    }
}

/// A canonical CBOR decoder.
///
/// Rejects non-shortest integer heads, unsorted or duplicate map keys,
/// non-text map keys, indefinite lengths, floats narrower than 64 bits,
/// tags and `undefined`.
pub struct CanonicalDecoder<'a> {
    data: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> CanonicalDecoder<'a> {
    /// Create a new decoder for the given bytes.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            depth: 0,
        }
    }

    /// Check if all bytes have been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Fails if any input remains.
    pub fn finish(&self) -> CodecResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CodecError::TrailingBytes {
                count: self.data.len() - self.pos,
            })
        }
    }

    /// Decode the next value.
    pub fn decode(&mut self) -> CodecResult<Value> {
        let initial_byte = self.read_byte()?;
        let major_type = initial_byte >> 5;
        let info = initial_byte & 0x1f;

        match major_type {
            0 => {
                let n = self.decode_argument(info)?;
                i64::try_from(n)
                    .map(Value::Integer)
                    .map_err(|_| CodecError::IntegerOverflow)
            }
            1 => {
                let n = self.decode_argument(info)?;
                let n = i64::try_from(n).map_err(|_| CodecError::IntegerOverflow)?;
                Ok(Value::Integer(-1 - n))
            }
            2 => {
                let len = self.decode_length(info, MAX_BYTES_LENGTH)?;
                Ok(Value::Bytes(self.read_bytes(len)?.to_vec()))
            }
            3 => self.decode_text(info).map(Value::Text),
            4 => self.nested(|d| d.decode_array(info)),
            5 => self.nested(|d| d.decode_map(info)).map(Value::Map),
            6 => Err(CodecError::invalid_structure("tags are not supported")),
            _ => self.decode_simple(info),
        }
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> CodecResult<T>) -> CodecResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(CodecError::invalid_structure("nesting too deep"));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    #[inline]
    fn read_byte(&mut self) -> CodecResult<u8> {
        let byte = *self.data.get(self.pos).ok_or(CodecError::UnexpectedEof)?;
        self.pos += 1;
        Ok(byte)
    }

    #[inline]
    fn read_bytes(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        let end = self.pos.checked_add(len).ok_or(CodecError::UnexpectedEof)?;
        let bytes = self.data.get(self.pos..end).ok_or(CodecError::UnexpectedEof)?;
        self.pos = end;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    fn decode_argument(&mut self, info: u8) -> CodecResult<u64> {
        let (value, min) = match info {
            0..=23 => return Ok(u64::from(info)),
            24 => (u64::from(self.read_byte()?), 24),
            25 => (u64::from(u16::from_be_bytes(self.read_array()?)), 0x100),
            26 => (u64::from(u32::from_be_bytes(self.read_array()?)), 0x1_0000),
            27 => (u64::from_be_bytes(self.read_array()?), 0x1_0000_0000),
            31 => return Err(CodecError::IndefiniteLengthForbidden),
            _ => return Err(CodecError::invalid_structure("reserved additional info")),
        };
        if value < min {
            return Err(CodecError::invalid_structure(
                "non-canonical: value could be encoded in fewer bytes",
            ));
        }
        Ok(value)
    }

    fn decode_length(&mut self, info: u8, max: u64) -> CodecResult<usize> {
        let claimed = self.decode_argument(info)?;
        if claimed > max {
            return Err(CodecError::SizeLimitExceeded {
                claimed,
                max_allowed: max,
            });
        }
        usize::try_from(claimed).map_err(|_| CodecError::SizeLimitExceeded {
            claimed,
            max_allowed: max,
        })
    }

    fn decode_text(&mut self, info: u8) -> CodecResult<String> {
        let len = self.decode_length(info, MAX_BYTES_LENGTH)?;
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| CodecError::InvalidUtf8)
    }

    fn decode_array(&mut self, info: u8) -> CodecResult<Value> {
        let len = self.decode_length(info, MAX_CONTAINER_ELEMENTS)?;
        let mut items = Vec::with_capacity(len.min(1024));
        for _ in 0..len {
            items.push(self.decode()?);
        }
        Ok(Value::Array(items))
    }

    fn decode_map(&mut self, info: u8) -> CodecResult<BTreeMap<String, Value>> {
        let len = self.decode_length(info, MAX_CONTAINER_ELEMENTS)?;
        let mut entries = BTreeMap::new();
        let mut prev: Option<String> = None;

        for _ in 0..len {
            let head = self.read_byte()?;
            if head >> 5 != 3 {
                return Err(CodecError::unsupported_type("non-text map key"));
            }
            let key = self.decode_text(head & 0x1f)?;

            // Keys must be strictly increasing: length-first, then bytewise.
            if let Some(prev) = &prev {
                let order = prev
                    .len()
                    .cmp(&key.len())
                    .then_with(|| prev.as_bytes().cmp(key.as_bytes()));
                if order != Ordering::Less {
                    return Err(CodecError::invalid_structure(
                        "non-canonical: map keys not in sorted order",
                    ));
                }
            }

            let value = self.decode()?;
            prev = Some(key.clone());
            entries.insert(key, value);
        }
        Ok(entries)
    }

    fn decode_simple(&mut self, info: u8) -> CodecResult<Value> {
        match info {
            20 => Ok(Value::Bool(false)),
            21 => Ok(Value::Bool(true)),
            22 => Ok(Value::Null),
            23 => Err(CodecError::invalid_structure("undefined is not supported")),
            25 | 26 => Err(CodecError::NonCanonicalFloat),
            27 => {
                let x = f64::from_bits(u64::from_be_bytes(self.read_array()?));
                if x.is_nan() {
                    return Err(CodecError::NaNForbidden);
                }
                Ok(Value::Float(x))
            }
            31 => Err(CodecError::invalid_structure("break without indefinite")),
            _ => Err(CodecError::unsupported_type(format!("simple value {info}"))),
        }
    }
}
