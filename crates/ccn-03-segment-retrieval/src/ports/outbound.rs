//! # Outbound Ports
//!
//! Traits for the collaborators a retrieval session drives: the Interest
//! transport, the content handler and the segment naming profile.

use async_trait::async_trait;
use ccn_02_interest_matching::Interest;
use parking_lot::Mutex;
use shared_types::{ContentObject, Name, NameComponent};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use crate::domain::{QueryHandle, SessionId};
use crate::error::{HandlerError, TransportError};

/// Interest transport - outbound port.
///
/// Both calls are non-blocking submissions. Content satisfying an expressed
/// Interest comes back through
/// [`ContentListener::on_arrival`](crate::ports::inbound::ContentListener::on_arrival),
/// at least once per distinct object.
pub trait InterestTransport: Send + Sync {
    /// Register `interest` on behalf of `session`.
    fn express_interest(
        &self,
        session: SessionId,
        interest: &Interest,
    ) -> Result<QueryHandle, TransportError>;

    /// Stop waiting for content on a previously expressed Interest.
    fn withdraw_interest(&self, handle: QueryHandle) -> Result<(), TransportError>;
}

/// Side effects reported by a content handler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HandlerOutcome {
    /// Stored content changed the namespace policy.
    pub namespace_policy_changed: bool,
    /// Names to send in a name-enumeration response.
    pub enumerated_names: Vec<Name>,
}

/// Content handler - outbound port.
///
/// Runs off the session's critical path; failures never reach the session.
#[async_trait]
pub trait ContentHandler: Send + Sync {
    /// Process (typically store) one content object.
    async fn handle(&self, object: ContentObject) -> Result<HandlerOutcome, HandlerError>;
}

/// Segment and version naming profile - outbound port.
pub trait SegmentNaming: Send + Sync {
    /// True if the last component of `name` is a segment number.
    fn is_segment(&self, name: &Name) -> bool;

    /// Segment number carried by the last component of `name`.
    fn segment_number(&self, name: &Name) -> Option<u64>;

    /// `prefix` with segment `number`, replacing an existing segment component.
    fn segment_name(&self, prefix: &Name, number: u64) -> Name;

    /// True if `name` ends in a version, optionally followed by segments.
    fn has_terminal_version(&self, name: &Name) -> bool;

    /// Number of components up to and including the terminal version.
    fn terminal_version_cut_point(&self, name: &Name) -> Option<usize>;

    /// Encode segment `number` as a name component.
    fn segment_component(&self, number: u64) -> NameComponent;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Transport that records every call and can be told to refuse Interests.
#[derive(Default)]
pub struct RecordingTransport {
    next_handle: AtomicU64,
    fail_all: AtomicBool,
    fail_names: Mutex<HashSet<Name>>,
    expressed: Mutex<Vec<(SessionId, Interest, QueryHandle)>>,
    withdrawn: Mutex<Vec<QueryHandle>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse (or accept again) every Interest.
    pub fn set_failing(&self, failing: bool) {
        self.fail_all.store(failing, Ordering::SeqCst);
    }

    /// Refuse Interests for exactly this name until cleared.
    pub fn fail_name(&self, name: Name) {
        self.fail_names.lock().insert(name);
    }

    pub fn clear_failures(&self) {
        self.fail_all.store(false, Ordering::SeqCst);
        self.fail_names.lock().clear();
    }

    /// Names of accepted Interests, in issue order.
    pub fn expressed_names(&self) -> Vec<Name> {
        self.expressed
            .lock()
            .iter()
            .map(|(_, interest, _)| interest.name().clone())
            .collect()
    }

    /// Handle of the accepted Interest for `name`, most recent first.
    pub fn handle_for(&self, name: &Name) -> Option<QueryHandle> {
        self.expressed
            .lock()
            .iter()
            .rev()
            .find(|(_, interest, _)| interest.name() == name)
            .map(|(_, _, handle)| *handle)
    }

    pub fn withdrawn(&self) -> Vec<QueryHandle> {
        self.withdrawn.lock().clone()
    }
}

impl InterestTransport for RecordingTransport {
    fn express_interest(
        &self,
        session: SessionId,
        interest: &Interest,
    ) -> Result<QueryHandle, TransportError> {
        if self.fail_all.load(Ordering::SeqCst) || self.fail_names.lock().contains(interest.name()) {
            return Err(TransportError::Rejected(format!("mock refused {}", interest.name())));
        }
        let handle = QueryHandle(self.next_handle.fetch_add(1, Ordering::SeqCst) + 1);
        self.expressed.lock().push((session, interest.clone(), handle));
        Ok(handle)
    }

    fn withdraw_interest(&self, handle: QueryHandle) -> Result<(), TransportError> {
        self.withdrawn.lock().push(handle);
        Ok(())
    }
}

/// Handler that records what it was given and can fail chosen names.
#[derive(Default)]
pub struct RecordingHandler {
    delay: Option<Duration>,
    fail_names: Mutex<HashSet<Name>>,
    handled: Mutex<Vec<Name>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long before handling each object.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn fail_name(&self, name: Name) {
        self.fail_names.lock().insert(name);
    }

    /// Names handled successfully, in completion order.
    pub fn handled(&self) -> Vec<Name> {
        self.handled.lock().clone()
    }
}

#[async_trait]
impl ContentHandler for RecordingHandler {
    async fn handle(&self, object: ContentObject) -> Result<HandlerOutcome, HandlerError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_names.lock().contains(object.name()) {
            return Err(HandlerError::Storage(format!("mock failure for {}", object.name())));
        }
        self.handled.lock().push(object.name().clone());
        Ok(HandlerOutcome::default())
    }
}
