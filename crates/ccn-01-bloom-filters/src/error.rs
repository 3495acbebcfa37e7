//! Error types for Bloom filters

use thiserror::Error;

/// Errors that can occur when building or decoding a Bloom filter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Invalid filter parameters: {0}")]
    InvalidParameters(String),

    #[error("Malformed filter: {0}")]
    Malformed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}
