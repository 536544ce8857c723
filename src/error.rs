//! Custom error types for Hearth
//!
//! This module defines the error hierarchy for the encryption layer using
//! thiserror for ergonomic error definitions.

use thiserror::Error;

/// The main error type for Hearth operations
#[derive(Error, Debug)]
pub enum HearthError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for caller input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Low-level encryption or decryption errors
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// A strict decryption (backup restore) could not produce a value
    #[error("invalid encrypted file or wrong key")]
    InvalidEncryptedPayload,

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),
}

impl HearthError {
    /// Check if this is a rejected encrypted payload
    pub fn is_invalid_payload(&self) -> bool {
        matches!(self, Self::InvalidEncryptedPayload)
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a low-level encryption error
    pub fn is_encryption(&self) -> bool {
        matches!(self, Self::Encryption(_))
    }
}

impl From<std::io::Error> for HearthError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HearthError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Hearth operations
pub type HearthResult<T> = Result<T, HearthError>;
