//! # ShelfDB Core
//!
//! Schemaless document storage over a relational backing store.
//!
//! This crate provides:
//! - [`Document`]: an id, a storage key and an open-ended field map
//! - [`IndexCatalog`]: the field combinations declared for secondary lookup
//! - [`select_index`]: picks the index that best covers a query
//! - [`Store`]: saves and deletes documents, keeping the primary table and
//!   every index table in step, and answers [`Query`]s through a lazy
//!   [`Cursor`]
//!
//! Field maps are stored as canonical CBOR (see `shelfdb_codec`) in a blob
//! column. Each index table holds one row per document with the text
//! rendering of the indexed fields, so equality queries on those fields
//! narrow the primary table through a join before the remaining fields
//! are checked in memory.
//!
//! ## Usage
//!
//! ```
//! use shelfdb_core::{Config, Document, Query, Store};
//! use shelfdb_storage::InMemoryTableStore;
//!
//! let config = Config::new()
//!     .type_name("Person")
//!     .index(["name"])
//!     .index(["name", "city"]);
//! let mut store = Store::open(config, InMemoryTableStore::new()).unwrap();
//!
//! let mut alice = Document::new().with("name", "Alice").with("city", "Lisbon");
//! store.save(&mut alice).unwrap();
//!
//! let query = Query::all().field("name", "Alice").field("city", "Lisbon");
//! let people: Vec<_> = store.find(&query).unwrap().collect::<Result<_, _>>().unwrap();
//! assert_eq!(people, vec![alice.clone()]);
//!
//! store.delete(alice).unwrap();
//! assert_eq!(store.count(&Query::all()).unwrap(), 0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod document;
mod error;
mod index;
pub mod query;
mod schema;
mod store;
mod types;

pub use config::Config;
pub use document::{Document, DocumentId};
pub use error::{CoreError, CoreResult};
pub use index::{
    index_text, select_index, IndexCatalog, IndexDefinition, IndexEntry, FALSY_PLACEHOLDER,
};
pub use query::{AccessPath, Cursor, Query, QueryPlan};
pub use schema::{
    index_schema, primary_schema, DATA_COLUMN, ID_COLUMN, RESERVED_COLUMNS, STORAGE_KEY_COLUMN,
};
pub use store::{Store, StoreBuilder};
pub use types::StorageKey;
