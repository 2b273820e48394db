//! # ShelfDB Testkit
//!
//! Test utilities for ShelfDB.
//!
//! This crate provides:
//! - Test fixtures and store helpers
//! - Property-based test generators using proptest
//! - A model-checking harness for cross-crate integration tests
//! - Shared test vectors, exportable as JSON
//! - Tracing setup for tests
//!
//! ## Usage
//!
//! ```rust
//! use shelfdb_testkit::prelude::*;
//! use shelfdb_core::Query;
//!
//! let (store, docs) = scenarios::three_documents();
//! let hi = store.count(&Query::all().field("bar", "hi")).unwrap();
//! assert_eq!(hi, 2);
//! assert_eq!(docs.len(), 3);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;
pub mod logging;
pub mod vectors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
    pub use crate::logging::*;
    pub use crate::vectors::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
pub use logging::*;
pub use vectors::*;
