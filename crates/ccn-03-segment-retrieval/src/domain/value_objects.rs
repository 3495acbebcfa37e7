//! # Value Objects
//!
//! Small identifiers and keys used by retrieval sessions.

use serde::{Deserialize, Serialize};
use shared_types::Name;
use std::fmt;
use uuid::Uuid;

/// Identity of one retrieval session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transport-issued handle for an expressed Interest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryHandle(pub u64);

impl fmt::Display for QueryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Lifecycle of a retrieval session.
///
/// `Idle -> Active -> Cancelled`. Cancelled is terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    #[default]
    Idle,
    Active,
    Cancelled,
}

/// Key of an outstanding segment request.
///
/// Orders by segment number first, so the last key is always the
/// highest-numbered request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentKey {
    pub segment: u64,
    pub name: Name,
}

impl SegmentKey {
    pub fn new(segment: u64, name: Name) -> Self {
        Self { segment, name }
    }
}
