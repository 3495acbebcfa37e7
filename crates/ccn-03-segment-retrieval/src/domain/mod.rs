//! # Domain Layer
//!
//! Session identifiers and the pure window state. No I/O.

pub mod value_objects;
pub mod window;

pub use value_objects::{QueryHandle, SegmentKey, SessionId, SessionPhase};
pub use window::{OutstandingRequest, PlannedRequest, RetrievalWindow};
