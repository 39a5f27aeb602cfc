//! Error types for the editor

use crate::position::Position;
use crate::transaction::TransactionState;
use folio_schema::SchemaError;
use thiserror::Error;

pub type TransactionResult<T> = Result<T, TransactionError>;

/// Reasons a transaction is rejected. The document is unchanged whenever
/// one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransactionError {
    #[error("Transaction built against version {actual}, document is at version {expected}")]
    StaleVersion { expected: u64, actual: u64 },

    #[error("Invalid position: {0}")]
    InvalidPosition(Position),

    #[error("'{child}' is not allowed inside '{parent}'")]
    ContentViolation { parent: String, child: String },

    #[error("Range spans more than one container")]
    UnsupportedRange,

    #[error("Node '{0}' cannot be selected")]
    NotSelectable(String),

    #[error("Transaction already {0:?}")]
    Finished(TransactionState),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid command payload: {0}")]
    PayloadInvalid(String),

    #[error("Transaction rejected: {0}")]
    Transaction(#[from] TransactionError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl From<serde_json::Error> for EditorError {
    fn from(e: serde_json::Error) -> Self {
        EditorError::PayloadInvalid(e.to_string())
    }
}
