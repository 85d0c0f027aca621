//! Error types for Job Console

use thiserror::Error;

/// Main error type for Job Console operations
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Error reported by a storage backend
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database creation/opening error
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    /// Transaction error
    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    /// Table error
    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    /// Storage operation error
    #[error("Storage operation error: {0}")]
    StorageOp(#[from] redb::StorageError),

    /// Commit error
    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    /// Error during serialization/deserialization
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Progress values must lie within 0..=100
    #[error("Progress value out of range: {0}")]
    InvalidProgressValue(f64),

    /// An encoded record still exceeds the size ceiling after spilling
    #[error("Encoded record is {0} bytes, over the value field limit")]
    RecordTooLarge(usize),

    /// A reference record points at a hash field that does not exist
    #[error("Missing referenced value: {0}")]
    MissingReference(String),
}

/// Result type alias using ConsoleError
pub type ConsoleResult<T> = Result<T, ConsoleError>;
