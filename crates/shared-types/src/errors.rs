//! # Error Types
//!
//! Errors raised while parsing or encoding names.

use thiserror::Error;

/// Errors from name parsing and encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// URI could not be parsed as a name.
    #[error("Invalid name URI: {0}")]
    InvalidUri(String),

    /// Component does not fit in a flat-name delimiter.
    #[error("Component too long: {len} bytes exceeds {max}")]
    ComponentTooLong { len: usize, max: usize },

    /// Flat-name bytes are not well formed.
    #[error("Malformed flat name: {0}")]
    MalformedFlatname(String),
}
