//! # Segment Retrieval Session
//!
//! Retrieves one segmented, versioned object by keeping a window of
//! segment Interests in flight and refilling it as content arrives.
//!
//! ## Arrival cycle
//!
//! ```text
//! objects ──► ContentDispatcher (no lock held)
//!         └─► lock ─► narrow version ─► retire segment ─► refill window ─► unlock
//! ```
//!
//! Everything after the dispatch runs under one per-session mutex, so two
//! arrivals racing on the same session can never issue the same segment
//! twice or leave a hole in the requested range.

use ccn_02_interest_matching::Interest;
use ccn_telemetry::{log_session_event, INTERESTS_EXPRESSED, INTERESTS_WITHDRAWN, INTEREST_FAILURES, CONTENT_RECEIVED};
use parking_lot::Mutex;
use shared_types::{ContentObject, Name, NameComponent};
use std::time::{Duration, Instant};

use crate::domain::{
    OutstandingRequest, PlannedRequest, QueryHandle, RetrievalWindow, SessionId, SessionPhase,
};
use crate::error::RetrievalError;
use crate::ports::inbound::ContentListener;
use crate::ports::outbound::{InterestTransport, SegmentNaming};

use super::context::RetrievalContext;

const SUBSYSTEM: &str = "segment_retrieval";

/// Mutable state, guarded by the session mutex.
struct SessionState {
    phase: SessionPhase,
    current_interest: Interest,
    versioned_name: Name,
    window: RetrievalWindow,
    last_activity: Instant,
    initial_query: Option<QueryHandle>,
    header_query: Option<(Interest, QueryHandle)>,
    final_segment: Option<u64>,
}

/// What the locked part of the cycle needs from an arrived object.
struct Arrival {
    name: Name,
    final_block_id: Option<NameComponent>,
}

/// Windowed retrieval of one segmented object.
///
/// ## Thread Safety
///
/// Shared across tasks via `Arc`. Arrivals, issuance and cancellation all
/// take the same `parking_lot::Mutex`; content handling never does.
///
/// ## Dependencies
///
/// - `T: InterestTransport` - expresses and withdraws Interests
/// - `S: SegmentNaming` - reads and builds segment and version names
pub struct SegmentRetrievalSession<T, S>
where
    T: InterestTransport,
    S: SegmentNaming,
{
    id: SessionId,
    origin_interest: Interest,
    context: RetrievalContext<T, S>,
    state: Mutex<SessionState>,
}

impl<T, S> SegmentRetrievalSession<T, S>
where
    T: InterestTransport,
    S: SegmentNaming,
{
    /// Create an idle session. Nothing is expressed until [`start`](Self::start).
    pub fn new(origin_interest: Interest, interest: Interest, context: RetrievalContext<T, S>) -> Self {
        let window = RetrievalWindow::new(context.config.window_size);
        Self {
            id: SessionId::new(),
            origin_interest,
            state: Mutex::new(SessionState {
                phase: SessionPhase::Idle,
                versioned_name: interest.name().clone(),
                current_interest: interest,
                window,
                last_activity: Instant::now(),
                initial_query: None,
                header_query: None,
                final_segment: None,
            }),
            context,
        }
    }

    /// Express the current Interest and become active.
    ///
    /// Starting an active session does nothing. A refused Interest is
    /// returned to the caller and leaves the session idle.
    pub fn start(&self) -> Result<(), RetrievalError> {
        let mut state = self.state.lock();
        match state.phase {
            SessionPhase::Cancelled => return Err(RetrievalError::Cancelled(self.id)),
            SessionPhase::Active => return Ok(()),
            SessionPhase::Idle => {}
        }

        let handle = match self.context.transport.express_interest(self.id, &state.current_interest) {
            Ok(handle) => handle,
            Err(e) => {
                INTEREST_FAILURES.inc();
                log_session_event!(warn, SUBSYSTEM, "Initial Interest refused", self.id, name = %state.current_interest.name(), error = %e);
                return Err(e.into());
            }
        };

        INTERESTS_EXPRESSED.inc();
        state.initial_query = Some(handle);
        state.phase = SessionPhase::Active;
        state.last_activity = Instant::now();
        log_session_event!(info, SUBSYSTEM, "Retrieval started", self.id, name = %state.current_interest.name(), handle = %handle);
        Ok(())
    }

    /// Express and track a metadata (header) Interest.
    ///
    /// It is withdrawn together with the segment Interests on cancel. A
    /// previously tracked header Interest is withdrawn first.
    pub fn track_header_interest(&self, interest: Interest) -> Result<(), RetrievalError> {
        let mut state = self.state.lock();
        if state.phase == SessionPhase::Cancelled {
            return Err(RetrievalError::Cancelled(self.id));
        }

        let handle = self.context.transport.express_interest(self.id, &interest).map_err(|e| {
            INTEREST_FAILURES.inc();
            e
        })?;
        INTERESTS_EXPRESSED.inc();

        if let Some((_, previous)) = state.header_query.replace((interest, handle)) {
            self.withdraw(previous);
        }
        Ok(())
    }

    /// Process a batch of content delivered for `for_interest`.
    ///
    /// Each object goes to the handler pool first. Then, under the session
    /// lock, the versioned name is narrowed, segments are retired and the
    /// window is refilled. Arrivals on a cancelled session are ignored.
    pub fn handle_content(&self, objects: Vec<ContentObject>, for_interest: &Interest) {
        if self.phase() == SessionPhase::Cancelled {
            log_session_event!(debug, SUBSYSTEM, "Arrival after cancel ignored", self.id, count = objects.len());
            return;
        }

        let origin = self.origin_interest.name();
        let mut arrivals = Vec::with_capacity(objects.len());
        for object in objects {
            if !origin.is_prefix_of(object.name()) {
                log_session_event!(warn, SUBSYSTEM, "Content outside session namespace dropped", self.id, name = %object.name());
                continue;
            }
            CONTENT_RECEIVED.inc();
            arrivals.push(Arrival {
                name: object.name().clone(),
                final_block_id: object.signed_info().final_block_id.clone(),
            });
            self.context.dispatcher.dispatch(self.id, object);
        }

        let mut state = self.state.lock();
        if state.phase == SessionPhase::Cancelled {
            return;
        }

        if state.initial_query.is_some() && *for_interest == state.current_interest {
            state.initial_query = None;
        }
        if state.header_query.as_ref().is_some_and(|(header, _)| header == for_interest) {
            state.header_query = None;
        }

        for arrival in &arrivals {
            self.process_arrival(&mut state, arrival);
        }

        if state.phase == SessionPhase::Idle {
            state.phase = SessionPhase::Active;
        }
        state.last_activity = Instant::now();
    }

    /// Narrow, retire and refill for one object. Caller holds the lock.
    fn process_arrival(&self, state: &mut SessionState, arrival: &Arrival) {
        let naming = &self.context.naming;

        if !naming.has_terminal_version(&state.versioned_name) {
            if let Some(cut) = naming.terminal_version_cut_point(&arrival.name) {
                state.versioned_name = arrival.name.cut(cut);
                log_session_event!(debug, SUBSYSTEM, "Version resolved", self.id, versioned_name = %state.versioned_name);
            }
        }

        if let Some(segment) = naming.segment_number(&arrival.name) {
            if state.window.retire(segment, &arrival.name).is_none() {
                log_session_event!(debug, SUBSYSTEM, "Unsolicited or duplicate segment", self.id, segment = segment);
            }
            let is_final = arrival
                .final_block_id
                .as_ref()
                .is_some_and(|id| Some(id) == arrival.name.last());
            if is_final && state.final_segment.is_none() {
                state.final_segment = Some(segment);
                log_session_event!(info, SUBSYSTEM, "Final segment seen", self.id, segment = segment);
            }
        }

        let plan = state.window.plan_refill(|n| naming.segment_name(&arrival.name, n));
        for planned in plan {
            self.issue(state, planned);
        }
    }

    /// Express one planned segment Interest. Caller holds the lock.
    fn issue(&self, state: &mut SessionState, planned: PlannedRequest) {
        let interest = Interest::new(planned.name.clone());
        match self.context.transport.express_interest(self.id, &interest) {
            Ok(handle) => {
                INTERESTS_EXPRESSED.inc();
                log_session_event!(debug, SUBSYSTEM, "Segment requested", self.id, segment = planned.segment, retry = planned.is_retry);
                state
                    .window
                    .record_issued(planned.segment, planned.name, OutstandingRequest { interest, handle });
            }
            Err(e) => {
                INTEREST_FAILURES.inc();
                log_session_event!(warn, SUBSYSTEM, "Segment Interest refused, will retry", self.id, segment = planned.segment, error = %e);
                state.window.record_failed(planned.segment, planned.name);
            }
        }
    }

    /// Withdraw every Interest this session holds and stop processing.
    ///
    /// Idempotent. Withdrawal failures are logged and otherwise ignored.
    pub fn cancel(&self) {
        let mut state = self.state.lock();
        if state.phase == SessionPhase::Cancelled {
            return;
        }
        state.phase = SessionPhase::Cancelled;

        let mut handles: Vec<QueryHandle> = state
            .window
            .drain()
            .into_iter()
            .map(|(_, request)| request.handle)
            .collect();
        handles.extend(state.initial_query.take());
        handles.extend(state.header_query.take().map(|(_, handle)| handle));

        for handle in &handles {
            self.withdraw(*handle);
        }
        log_session_event!(info, SUBSYSTEM, "Retrieval cancelled", self.id, withdrawn = handles.len(), current_block = state.window.current_block());
    }

    fn withdraw(&self, handle: QueryHandle) {
        match self.context.transport.withdraw_interest(handle) {
            Ok(()) => INTERESTS_WITHDRAWN.inc(),
            Err(e) => {
                log_session_event!(warn, SUBSYSTEM, "Interest withdrawal failed", self.id, handle = %handle, error = %e);
            }
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn origin_interest(&self) -> &Interest {
        &self.origin_interest
    }

    /// The most recently issued defining Interest.
    pub fn current_interest(&self) -> Interest {
        self.state.lock().current_interest.clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.lock().phase
    }

    pub fn is_cancelled(&self) -> bool {
        self.phase() == SessionPhase::Cancelled
    }

    /// Next segment number not yet requested.
    pub fn current_block(&self) -> u64 {
        self.state.lock().window.current_block()
    }

    /// Best-known prefix through the terminal version.
    pub fn versioned_name(&self) -> Name {
        self.state.lock().versioned_name.clone()
    }

    /// Outstanding segment numbers, ascending.
    pub fn outstanding_segments(&self) -> Vec<u64> {
        self.state.lock().window.outstanding_segments()
    }

    /// Segments whose issuance failed and will be re-attempted.
    pub fn retry_segments(&self) -> Vec<u64> {
        self.state.lock().window.retry_segments()
    }

    pub fn last_activity(&self) -> Instant {
        self.state.lock().last_activity
    }

    /// True if nothing happened for longer than `threshold` before `now`.
    pub fn is_stale(&self, now: Instant, threshold: Duration) -> bool {
        now.saturating_duration_since(self.last_activity()) > threshold
    }

    /// Segment number of the object marked as the last one, once seen.
    pub fn final_segment(&self) -> Option<u64> {
        self.state.lock().final_segment
    }

    /// True once the final segment and every request up to it were answered.
    pub fn is_complete(&self) -> bool {
        let state = self.state.lock();
        state
            .final_segment
            .is_some_and(|last| !state.window.has_pending_through(last))
    }
}

impl<T, S> ContentListener for SegmentRetrievalSession<T, S>
where
    T: InterestTransport,
    S: SegmentNaming,
{
    fn on_arrival(&self, objects: Vec<ContentObject>, for_interest: &Interest) {
        self.handle_content(objects, for_interest);
    }
}
