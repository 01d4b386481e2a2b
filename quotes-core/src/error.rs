//! Error types for quote stores

use crate::types::QuoteId;
use thiserror::Error;

/// Main error type for store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// The referenced quote does not exist
    #[error("Quote {0} not found")]
    NotFound(QuoteId),

    /// No id is left above the highest stored one
    #[error("Quote id space exhausted")]
    IdSpaceExhausted,

    /// A quote payload failed validation
    #[error("Invalid quote: {0}")]
    InvalidQuote(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
