//! Error types for Interest matching

use thiserror::Error;

/// Errors raised when constructing an exclusion filter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExcludeError {
    /// An explicit component is not greater than the one before it.
    #[error("Exclude components out of order at element {index}")]
    InvalidOrdering { index: usize },

    /// Two Bloom elements with no explicit component between them.
    #[error("Adjacent Bloom elements at element {index}")]
    AdjacentBloom { index: usize },
}
