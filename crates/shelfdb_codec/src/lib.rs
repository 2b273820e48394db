//! # ShelfDB Codec
//!
//! Document values and canonical CBOR encoding for ShelfDB.
//!
//! A document's fields are a [`FieldMap`] of dynamically-typed [`Value`]s.
//! This crate turns field maps into the opaque bytes kept in the primary
//! table's blob column and back, with deterministic output:
//!
//! - Map keys are text, sorted length-first then bytewise
//! - Integers use shortest encoding
//! - Floats are always 64-bit doubles; NaN is rejected
//! - No indefinite-length items
//!
//! ## Usage
//!
//! ```
//! use shelfdb_codec::{decode_fields, encode_fields, FieldMap, Value};
//!
//! let mut fields = FieldMap::new();
//! fields.insert("foo".to_string(), Value::Integer(1));
//! fields.insert("bar".to_string(), Value::from("hi"));
//!
//! let bytes = encode_fields(&fields).unwrap();
//! assert_eq!(decode_fields(&bytes).unwrap(), fields);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
mod serde_impl;
mod value;

pub use decoder::{decode_fields, from_cbor, CanonicalDecoder};
pub use encoder::{encode_fields, to_canonical_cbor, CanonicalEncoder};
pub use error::{CodecError, CodecResult};
pub use value::{FieldMap, Value};
