//! Documents and their identifiers.

mod id;
mod model;

pub use id::DocumentId;
pub use model::Document;
