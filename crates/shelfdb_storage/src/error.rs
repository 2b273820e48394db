//! Error types for storage operations.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The named table does not exist.
    #[error("table not found: {name}")]
    TableNotFound {
        /// Name of the missing table.
        name: String,
    },

    /// A table with this name already exists.
    #[error("table already exists: {name}")]
    TableExists {
        /// Name of the existing table.
        name: String,
    },

    /// A row or predicate referenced a column the table does not declare.
    #[error("unknown column {column} in table {table}")]
    UnknownColumn {
        /// Table being accessed.
        table: String,
        /// The undeclared column.
        column: String,
    },

    /// A write would break a table constraint (nullability, key uniqueness).
    #[error("constraint violation on table {table}: {message}")]
    ConstraintViolation {
        /// Table being written.
        table: String,
        /// Description of the violated constraint.
        message: String,
    },

    /// The table schema is malformed.
    #[error("invalid schema for table {table}: {message}")]
    InvalidSchema {
        /// Table being created.
        table: String,
        /// Description of the problem.
        message: String,
    },

    /// `begin` was called while a transaction is already open.
    #[error("a transaction is already active")]
    TransactionActive,

    /// `commit` or `rollback` was called without an open transaction.
    #[error("no active transaction")]
    NoActiveTransaction,

    /// The backend does not implement transactions.
    #[error("transactions are not supported by this backend")]
    TransactionsUnsupported,
}

impl StorageError {
    /// Creates a table not found error.
    pub fn table_not_found(name: impl Into<String>) -> Self {
        Self::TableNotFound { name: name.into() }
    }

    /// Creates an unknown column error.
    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Creates a constraint violation error.
    pub fn constraint(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid schema error.
    pub fn invalid_schema(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            table: table.into(),
            message: message.into(),
        }
    }
}
