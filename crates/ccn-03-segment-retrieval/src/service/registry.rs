//! # Retrieval Session Registry
//!
//! Creates sessions, routes arrivals to them and cancels the ones that
//! finished or went quiet.

use ccn_02_interest_matching::Interest;
use ccn_telemetry::{log_event, log_session_event, ACTIVE_SESSIONS, SESSIONS_COMPLETED, SESSIONS_SWEPT};
use parking_lot::RwLock;
use shared_types::ContentObject;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

use crate::domain::SessionId;
use crate::error::RetrievalError;
use crate::ports::outbound::{InterestTransport, SegmentNaming};

use super::context::RetrievalContext;
use super::session::SegmentRetrievalSession;

const SUBSYSTEM: &str = "session_registry";

/// Live retrieval sessions keyed by id.
///
/// ## Thread Safety
///
/// The session map sits behind a `parking_lot::RwLock`. The registry lock
/// is never held while a session cancels, so transport calls made during
/// cancellation cannot block routing to other sessions.
pub struct RetrievalSessionRegistry<T, S>
where
    T: InterestTransport,
    S: SegmentNaming,
{
    context: RetrievalContext<T, S>,
    sessions: RwLock<HashMap<SessionId, Arc<SegmentRetrievalSession<T, S>>>>,
}

impl<T, S> RetrievalSessionRegistry<T, S>
where
    T: InterestTransport,
    S: SegmentNaming,
{
    pub fn new(context: RetrievalContext<T, S>) -> Self {
        Self {
            context,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn context(&self) -> &RetrievalContext<T, S> {
        &self.context
    }

    /// Start retrieving `interest`, or return the live session already doing so.
    pub fn start_session(
        &self,
        origin: Interest,
        interest: Interest,
    ) -> Result<Arc<SegmentRetrievalSession<T, S>>, RetrievalError> {
        let session = {
            let mut sessions = self.sessions.write();
            let existing = sessions
                .values()
                .find(|s| !s.is_cancelled() && s.current_interest().name() == interest.name());
            if let Some(existing) = existing {
                log_session_event!(debug, SUBSYSTEM, "Reusing live session", existing.id(), name = %interest.name());
                return Ok(Arc::clone(existing));
            }

            let session = Arc::new(SegmentRetrievalSession::new(origin, interest, self.context.clone()));
            sessions.insert(session.id(), Arc::clone(&session));
            ACTIVE_SESSIONS.set(sessions.len() as f64);
            session
        };

        if let Err(e) = session.start() {
            self.remove(session.id());
            return Err(e);
        }
        Ok(session)
    }

    /// Deliver an arrival batch to session `id`.
    ///
    /// Returns false if no such session is registered. A session that has
    /// now received everything up to its final segment is cancelled and
    /// removed.
    pub fn route(&self, id: SessionId, objects: Vec<ContentObject>, for_interest: &Interest) -> bool {
        let Some(session) = self.get(id) else {
            log_session_event!(warn, SUBSYSTEM, "Content for unknown session dropped", id, count = objects.len());
            return false;
        };

        session.handle_content(objects, for_interest);

        if session.is_complete() && self.remove(id).is_some() {
            session.cancel();
            SESSIONS_COMPLETED.inc();
            log_session_event!(info, SUBSYSTEM, "Retrieval complete", id, final_segment = ?session.final_segment());
        }
        true
    }

    /// Cancel and remove session `id`. Returns false if it was not registered.
    pub fn cancel(&self, id: SessionId) -> bool {
        match self.remove(id) {
            Some(session) => {
                session.cancel();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: SessionId) -> Option<Arc<SegmentRetrievalSession<T, S>>> {
        self.sessions.read().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Cancel and remove every session idle longer than `stale_after` at `now`.
    ///
    /// Sessions cancelled directly through the session handle are removed
    /// as well. Returns the ids of all removed sessions.
    pub fn sweep_stale(&self, now: Instant) -> Vec<SessionId> {
        let threshold = self.context.config.stale_after;
        let removed: Vec<_> = {
            let mut sessions = self.sessions.write();
            let doomed: Vec<SessionId> = sessions
                .iter()
                .filter(|(_, s)| s.is_cancelled() || s.is_stale(now, threshold))
                .map(|(id, _)| *id)
                .collect();
            let removed: Vec<_> = doomed
                .into_iter()
                .filter_map(|id| sessions.remove(&id))
                .collect();
            ACTIVE_SESSIONS.set(sessions.len() as f64);
            removed
        };

        let mut swept = 0u64;
        for session in &removed {
            if !session.is_cancelled() {
                session.cancel();
                swept += 1;
                log_session_event!(info, SUBSYSTEM, "Stale session swept", session.id(), current_block = session.current_block());
            }
        }
        if swept > 0 {
            SESSIONS_SWEPT.inc_by(swept as f64);
        }
        removed.iter().map(|s| s.id()).collect()
    }

    fn remove(&self, id: SessionId) -> Option<Arc<SegmentRetrievalSession<T, S>>> {
        let mut sessions = self.sessions.write();
        let removed = sessions.remove(&id);
        ACTIVE_SESSIONS.set(sessions.len() as f64);
        removed
    }
}

impl<T, S> RetrievalSessionRegistry<T, S>
where
    T: InterestTransport + 'static,
    S: SegmentNaming + 'static,
{
    /// Run [`sweep_stale`](Self::sweep_stale) every `sweep_interval`.
    ///
    /// The task holds only a weak reference and exits once the registry is
    /// dropped.
    pub fn spawn_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let registry = Arc::downgrade(self);
        let period = self.context.config.sweep_interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(registry) = registry.upgrade() else {
                    log_event!(debug, SUBSYSTEM, "Registry dropped, sweeper exiting");
                    break;
                };
                let swept = registry.sweep_stale(Instant::now());
                if !swept.is_empty() {
                    log_event!(debug, SUBSYSTEM, "Sweep finished", removed = swept.len());
                }
            }
        })
    }
}
