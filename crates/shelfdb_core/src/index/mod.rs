//! Secondary indexes.
//!
//! Each declared [`IndexDefinition`] is backed by an auxiliary table with
//! one row per document, keyed by document id, holding the text rendering
//! of the indexed fields. Queries use at most one index: the one chosen by
//! [`select_index`].

mod catalog;
mod selector;
mod text;

pub use catalog::{IndexCatalog, IndexDefinition, IndexEntry};
pub use selector::select_index;
pub use text::{index_text, FALSY_PLACEHOLDER};

pub(crate) use text::index_row;
