//! # CCN-03 Segment Retrieval
//!
//! Windowed retrieval of segmented, versioned content.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  RetrievalSessionRegistry                    │
//! │   start_session ─ route ─ cancel ─ sweep_stale (sweeper)     │
//! └──────────────┬───────────────────────────────────────────────┘
//!                │ Arc<SegmentRetrievalSession>
//!                ▼
//! ┌──────────────────────────────┐     ┌────────────────────────┐
//! │   SegmentRetrievalSession    │────►│   ContentDispatcher    │
//! │  Mutex<{window, version}>    │     │  semaphore-bounded     │
//! └──────┬───────────────┬───────┘     └───────────┬────────────┘
//!        │               │                         ▼
//!        ▼               ▼                  ContentHandler (port)
//! InterestTransport  SegmentNaming
//!     (port)            (port, MarkerNaming adapter)
//! ```
//!
//! - **Domain Layer** (`domain/`): session ids and the pure `RetrievalWindow`
//! - **Ports Layer** (`ports/`): transport, handler and naming traits, plus
//!   recording mocks for tests
//! - **Service Layer** (`service/`): sessions, registry and the handler pool
//! - **Adapters** (`adapters/`): the marker-based naming profile
//!
//! ## Window Invariants
//!
//! - `current_block` never decreases.
//! - At most `window_size` segment Interests are outstanding per session.
//! - A refused issuance is re-attempted on the next arrival, never dropped.
//! - Content handling never runs under the session lock.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::MarkerNaming;
pub use config::{ConfigError, RetrievalConfig};
pub use domain::{QueryHandle, RetrievalWindow, SegmentKey, SessionId, SessionPhase};
pub use error::{HandlerError, RetrievalError, TransportError};
pub use ports::{ContentHandler, ContentListener, HandlerOutcome, InterestTransport, SegmentNaming};
pub use service::{ContentDispatcher, RetrievalContext, RetrievalSessionRegistry, SegmentRetrievalSession};
