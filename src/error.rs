use crate::category::CategoryId;

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Cannot read import file '{}': {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("No category resolved for '{category}' after reconciliation")]
    FatalReconciliation { category: String },

    #[error("Failed to remove import file '{}': {source}", .path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Row reader task failed: {0}")]
    StreamTask(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Category already exists: {0}")]
    DuplicateCategory(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(CategoryId),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Reasons a single row is rejected. Never surfaced past the collector.
#[derive(Debug, Error, PartialEq)]
pub enum RowFormatError {
    #[error("Malformed line {line:?}: {message}")]
    Malformed { line: Option<u64>, message: String },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid transaction type: {0}")]
    InvalidType(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
