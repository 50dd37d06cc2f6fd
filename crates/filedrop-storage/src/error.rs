//! Storage operation errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Destination already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid storage name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage configuration error: {0}")]
    Config(String),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;
