//! Custom error types for decrypt-tables
//!
//! This module defines the error hierarchy for the tool using thiserror.
//! Errors fall into three scopes: run-level (fatal before any table is
//! touched), unit-level (abort one file or table, the batch continues) and
//! cell-level (never escalate past the cell).

use thiserror::Error;

/// The main error type for decrypt-tables operations
#[derive(Error, Debug)]
pub enum DecryptError {
    /// A file, directory or database connection could not be opened
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// A database query could not be prepared or failed while streaming rows
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// The configuration payload or settings file is missing, empty or unparsable
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    /// A single cell could not be decrypted
    #[error("Decryption failed: {0}")]
    CellDecryption(String),

    /// The output destination could not be created or written
    #[error("Write failed: {0}")]
    SinkWrite(String),

    /// The secret for a purpose could not be retrieved
    #[error("Secret unavailable: {0}")]
    Secret(String),

    /// Key derivation or cipher setup errors
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl DecryptError {
    /// Create a cell decryption error
    pub fn cell(message: impl Into<String>) -> Self {
        Self::CellDecryption(message.into())
    }

    /// Errors that abort a single table or file but not the batch
    pub fn is_unit_failure(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable(_) | Self::QueryFailed(_) | Self::SinkWrite(_) | Self::Io(_)
        )
    }
}

impl From<std::io::Error> for DecryptError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias for decrypt-tables operations
pub type DecryptResult<T> = Result<T, DecryptError>;
