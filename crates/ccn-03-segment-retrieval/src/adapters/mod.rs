//! # Adapters
//!
//! Concrete implementations of outbound ports.

pub mod marker_naming;

pub use marker_naming::{MarkerNaming, SEGMENT_MARKER, VERSION_MARKER};
