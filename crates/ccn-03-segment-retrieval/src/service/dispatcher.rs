//! # Content Dispatcher
//!
//! Hands arriving content to the [`ContentHandler`] off the session's
//! critical path.
//!
//! Every object becomes its own tokio task. A semaphore bounds how many
//! handlers run at once; excess objects wait for a permit without holding
//! up the caller. A handler error or panic affects only its own object.

use ccn_telemetry::{log_session_event, time_histogram, HANDLER_DURATION, HANDLER_FAILURES};
use shared_types::ContentObject;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{Notify, Semaphore};

use crate::domain::SessionId;
use crate::error::RetrievalError;
use crate::ports::outbound::ContentHandler;

const SUBSYSTEM: &str = "content_dispatch";

/// Count of dispatched objects not yet finished.
#[derive(Default)]
struct Pending {
    count: AtomicUsize,
    idle: Notify,
}

/// Decrements the pending count when a handler task ends, however it ends.
struct PendingGuard(Arc<Pending>);

impl PendingGuard {
    fn new(pending: Arc<Pending>) -> Self {
        pending.count.fetch_add(1, Ordering::SeqCst);
        Self(pending)
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if self.0.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

/// Bounded pool of content-handler tasks.
pub struct ContentDispatcher {
    handler: Arc<dyn ContentHandler>,
    permits: Arc<Semaphore>,
    pending: Arc<Pending>,
    runtime: Handle,
}

impl ContentDispatcher {
    /// Create a dispatcher on the current tokio runtime.
    pub fn new(handler: Arc<dyn ContentHandler>, workers: usize) -> Result<Self, RetrievalError> {
        let runtime = Handle::try_current().map_err(|e| RetrievalError::NoRuntime(e.to_string()))?;
        Ok(Self::with_runtime(handler, workers, runtime))
    }

    /// Create a dispatcher that spawns onto `runtime`.
    pub fn with_runtime(handler: Arc<dyn ContentHandler>, workers: usize, runtime: Handle) -> Self {
        Self {
            handler,
            permits: Arc::new(Semaphore::new(workers.max(1))),
            pending: Arc::new(Pending::default()),
            runtime,
        }
    }

    /// Queue `object` for handling and return immediately.
    pub fn dispatch(&self, session: SessionId, object: ContentObject) {
        let handler = Arc::clone(&self.handler);
        let permits = Arc::clone(&self.permits);
        let pending = PendingGuard::new(Arc::clone(&self.pending));

        self.runtime.spawn(async move {
            let _pending = pending;
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            let name = object.name().clone();
            let _timer = time_histogram!(HANDLER_DURATION);

            // Run the handler in its own task so a panic surfaces as a JoinError.
            match tokio::spawn(async move { handler.handle(object).await }).await {
                Ok(Ok(outcome)) => {
                    log_session_event!(debug, SUBSYSTEM, "Content handled", session, name = %name);
                    if outcome.namespace_policy_changed {
                        log_session_event!(info, SUBSYSTEM, "Namespace policy changed", session, name = %name);
                    }
                    if !outcome.enumerated_names.is_empty() {
                        log_session_event!(
                            info,
                            SUBSYSTEM,
                            "Name enumeration response ready",
                            session,
                            name = %name,
                            count = outcome.enumerated_names.len()
                        );
                    }
                }
                Ok(Err(e)) => {
                    HANDLER_FAILURES.inc();
                    log_session_event!(warn, SUBSYSTEM, "Content handler failed", session, name = %name, error = %e);
                }
                Err(e) => {
                    HANDLER_FAILURES.inc();
                    log_session_event!(error, SUBSYSTEM, "Content handler panicked", session, name = %name, error = %e);
                }
            }
        });
    }

    /// Objects dispatched but not finished.
    pub fn pending(&self) -> usize {
        self.pending.count.load(Ordering::SeqCst)
    }

    /// Wait until every dispatched object has been handled.
    pub async fn drain(&self) {
        loop {
            let idle = self.pending.idle.notified();
            if self.pending() == 0 {
                return;
            }
            idle.await;
        }
    }
}
