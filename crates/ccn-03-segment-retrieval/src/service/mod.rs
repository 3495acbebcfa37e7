//! # Service Layer
//!
//! - `dispatcher`: bounded pool running the content handler
//! - `session`: windowed retrieval of one object
//! - `registry`: session lifecycle, routing and staleness sweep

pub mod context;
pub mod dispatcher;
pub mod registry;
pub mod session;

pub use context::RetrievalContext;
pub use dispatcher::ContentDispatcher;
pub use registry::RetrievalSessionRegistry;
pub use session::SegmentRetrievalSession;
