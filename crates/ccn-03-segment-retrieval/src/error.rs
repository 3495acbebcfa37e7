//! # Retrieval Errors
//!
//! Error types for segment retrieval and its collaborators.

use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::{QueryHandle, SessionId};

/// Errors surfaced to callers of sessions and the registry.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The transport refused the initial Interest.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The session was already torn down.
    #[error("Session {0} is cancelled")]
    Cancelled(SessionId),

    /// No tokio runtime was available to run content handlers.
    #[error("No async runtime available: {0}")]
    NoRuntime(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Errors reported by an `InterestTransport`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The transport could not register the Interest.
    #[error("Interest rejected: {0}")]
    Rejected(String),

    /// Withdrawal of a query the transport does not know.
    #[error("Unknown query handle: {0}")]
    UnknownHandle(QueryHandle),

    /// The transport is shut down.
    #[error("Transport closed")]
    Closed,
}

/// Errors reported by a `ContentHandler`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The content could not be stored.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The handler refused the content.
    #[error("Content rejected: {0}")]
    Rejected(String),
}
