//! # Ports
//!
//! - `inbound`: what the transport calls on a session
//! - `outbound`: what a session calls on its collaborators

pub mod inbound;
pub mod outbound;

pub use inbound::ContentListener;
pub use outbound::{
    ContentHandler, HandlerOutcome, InterestTransport, RecordingHandler, RecordingTransport,
    SegmentNaming,
};
