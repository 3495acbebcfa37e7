//! Domain layer for Interest matching

pub mod exclude;
pub mod interest;

pub use exclude::{ExcludeElement, ExcludeFilter};
pub use interest::{AnswerOriginKind, ChildSelector, Interest, PublisherConstraint};
