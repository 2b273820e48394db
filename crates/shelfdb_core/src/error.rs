//! Error types for ShelfDB core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in ShelfDB core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Backing store error.
    #[error("storage error: {0}")]
    Storage(#[from] shelfdb_storage::StorageError),

    /// Field map codec error.
    #[error("codec error: {0}")]
    Codec(#[from] shelfdb_codec::CodecError),

    /// The store configuration is incomplete or invalid.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the problem.
        message: String,
    },

    /// The document has neither a storage key nor an id.
    #[error("document has no identity: it needs a storage key or an id")]
    NoIdentity,

    /// A declared index has no backing table.
    #[error("index table not found: {name}")]
    IndexTableNotFound {
        /// Name of the missing index table.
        name: String,
    },

    /// A stored row does not have the expected shape.
    #[error("invalid stored row: {message}")]
    InvalidFormat {
        /// Description of the format issue.
        message: String,
    },
}

impl CoreError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an index table not found error.
    pub fn index_table_not_found(name: impl Into<String>) -> Self {
        Self::IndexTableNotFound { name: name.into() }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfdb_storage::StorageError;

    #[test]
    fn storage_errors_convert() {
        let err: CoreError = StorageError::table_not_found("doc").into();
        assert!(matches!(err, CoreError::Storage(_)));
        assert_eq!(err.to_string(), "storage error: table not found: doc");
    }

    #[test]
    fn helper_constructors() {
        assert!(matches!(
            CoreError::index_table_not_found("doc_foo"),
            CoreError::IndexTableNotFound { name } if name == "doc_foo"
        ));
        assert_eq!(
            CoreError::config("no indexes declared").to_string(),
            "configuration error: no indexes declared"
        );
    }
}
