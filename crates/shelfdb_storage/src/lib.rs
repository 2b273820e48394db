//! # ShelfDB Storage
//!
//! Relational backing store trait and implementations for ShelfDB.
//!
//! This crate provides the lowest-level storage abstraction for ShelfDB.
//! Table stores are **plain relational stores** - they hold named tables of
//! typed cells and answer equality predicates. They do not interpret the
//! serialized documents kept in blob columns.
//!
//! ## Design Principles
//!
//! - Stores expose table DDL, row CRUD, equality selects and a key join
//! - One call is one statement; atomicity across calls is opt-in via
//!   `begin`/`commit`/`rollback`
//! - Must be `Send + Sync`
//! - ShelfDB owns table naming, layout and blob interpretation
//!
//! ## Available Stores
//!
//! - [`InMemoryTableStore`] - For testing and ephemeral storage
//!
//! ## Example
//!
//! ```rust
//! use shelfdb_storage::{ColumnDef, InMemoryTableStore, Predicate, Row, TableSchema, TableStore};
//!
//! let mut store = InMemoryTableStore::new();
//! let schema = TableSchema::new("users")
//!     .column(ColumnDef::auto_increment("key"))
//!     .column(ColumnDef::text("name").indexed());
//! store.create_table(&schema).unwrap();
//!
//! store.insert("users", Row::new().with("name", "alice")).unwrap();
//! let rows = store.select("users", &Predicate::eq("name", "alice")).unwrap();
//! assert_eq!(rows.len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod memory;
mod row;
mod schema;

pub use backend::TableStore;
pub use error::{StorageError, StorageResult};
pub use memory::InMemoryTableStore;
pub use row::{Cell, Predicate, Row, RowKey};
pub use schema::{ColumnDef, ColumnType, TableSchema};
