//! # Retrieval Flows
//!
//! End-to-end windowed retrieval through `RetrievalSessionRegistry` with an
//! in-memory "network" that answers segment Interests from a publisher-side
//! store using `Interest::matches`.
//!
//! ## Flows Tested:
//!
//! 1. **Full download**: a versioned, segmented object is fetched from the
//!    first Interest to the final segment, and the session completes itself
//! 2. **Reordering**: arrivals 2, 0, 1, 3 with a window of four
//! 3. **Transport outage**: refused Interests are re-issued once the
//!    transport recovers
//! 4. **Liveness**: idle sessions are swept; cancellation is idempotent
//! 5. **Handler isolation**: a failing content handler does not stall the
//!    window

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, VecDeque};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use ccn_02_interest_matching::Interest;
    use ccn_03_segment_retrieval::ports::outbound::{RecordingHandler, RecordingTransport};
    use ccn_03_segment_retrieval::{
        ContentHandler, HandlerError, HandlerOutcome, InterestTransport, MarkerNaming,
        QueryHandle, RetrievalConfig, RetrievalContext, RetrievalSessionRegistry, SegmentNaming,
        SessionId, SessionPhase, TransportError,
    };
    use shared_types::{ContentObject, Name};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Transport that queues expressed Interests for the test to answer
    #[derive(Default)]
    struct QueueTransport {
        next: Mutex<u64>,
        pending: Mutex<VecDeque<(SessionId, Interest)>>,
        withdrawn: Mutex<Vec<QueryHandle>>,
    }

    impl InterestTransport for QueueTransport {
        fn express_interest(
            &self,
            session: SessionId,
            interest: &Interest,
        ) -> Result<QueryHandle, TransportError> {
            let mut next = self.next.lock();
            *next += 1;
            self.pending.lock().push_back((session, interest.clone()));
            Ok(QueryHandle(*next))
        }

        fn withdraw_interest(&self, handle: QueryHandle) -> Result<(), TransportError> {
            self.withdrawn.lock().push(handle);
            Ok(())
        }
    }

    /// Publisher-side segments of one versioned object
    struct Publisher {
        naming: MarkerNaming,
        versioned: Name,
        segments: Vec<ContentObject>,
    }

    impl Publisher {
        fn new(count: u64) -> Self {
            let naming = MarkerNaming::new();
            let versioned = Name::from_uri("/video/intro").unwrap().append(naming.version_component(3));
            let last = naming.segment_component(count - 1);
            let segments = (0..count)
                .map(|n| {
                    ContentObject::builder(naming.segment_name(&versioned, n))
                        .content(format!("chunk {}", n))
                        .final_block_id(last.clone())
                        .build()
                })
                .collect();
            Self { naming, versioned, segments }
        }

        /// The stored segment that satisfies `interest`, if any.
        fn answer(&self, interest: &Interest) -> Option<ContentObject> {
            interest.select_best(&self.segments).cloned()
        }

        fn segment(&self, n: u64) -> ContentObject {
            self.segments[n as usize].clone()
        }

        fn interest_for(&self, n: u64) -> Interest {
            Interest::new(self.naming.segment_name(&self.versioned, n))
        }
    }

    /// Handler storing content by name
    #[derive(Default)]
    struct MemoryRepository {
        stored: Mutex<BTreeMap<Name, Vec<u8>>>,
    }

    #[async_trait]
    impl ContentHandler for MemoryRepository {
        async fn handle(&self, object: ContentObject) -> Result<HandlerOutcome, HandlerError> {
            self.stored
                .lock()
                .insert(object.name().clone(), object.content().to_vec());
            Ok(HandlerOutcome::default())
        }
    }

    // =============================================================================
    // INTEGRATION TESTS: FULL DOWNLOAD
    // =============================================================================

    /// Fetch a 20-segment object through the registry until it completes
    #[tokio::test]
    async fn test_full_download_completes() {
        ccn_telemetry::register_metrics().unwrap();
        let completed_before = ccn_telemetry::SESSIONS_COMPLETED.get();
        let publisher = Publisher::new(20);
        let transport = Arc::new(QueueTransport::default());
        let repository = Arc::new(MemoryRepository::default());
        let context = RetrievalContext::new(
            transport.clone(),
            Arc::new(MarkerNaming::new()),
            repository.clone(),
            RetrievalConfig::for_testing().with_window_size(4),
        )
        .unwrap();
        let registry = RetrievalSessionRegistry::new(context.clone());

        let origin = Interest::new(publisher.versioned.clone());
        let session = registry.start_session(origin, publisher.interest_for(0)).unwrap();

        // Pump the network until nothing is pending or the session is gone.
        let mut rounds = 0;
        loop {
            let next = transport.pending.lock().pop_front();
            let Some((id, interest)) = next else { break };
            if let Some(object) = publisher.answer(&interest) {
                registry.route(id, vec![object], &interest);
            }
            rounds += 1;
            assert!(rounds < 200, "retrieval did not converge");
        }

        assert_eq!(session.phase(), SessionPhase::Cancelled, "completion cancels the session");
        assert!(registry.is_empty());
        assert_eq!(session.final_segment(), Some(19));
        assert!(ccn_telemetry::SESSIONS_COMPLETED.get() > completed_before);
        assert!(ccn_telemetry::encode_metrics()
            .unwrap()
            .contains("ccn_sessions_completed_total"));

        context.dispatcher.drain().await;
        let stored = repository.stored.lock();
        assert_eq!(stored.len(), 20, "every segment reached the repository");
        assert_eq!(stored.get(publisher.segment(7).name()).unwrap(), b"chunk 7");
    }

    // =============================================================================
    // INTEGRATION TESTS: WINDOW BEHAVIOUR
    // =============================================================================

    /// Window four, arrivals 2, 0, 1, 3
    #[tokio::test]
    async fn test_out_of_order_window() {
        let publisher = Publisher::new(32);
        let transport = Arc::new(RecordingTransport::new());
        let context = RetrievalContext::new(
            transport.clone(),
            Arc::new(MarkerNaming::new()),
            Arc::new(RecordingHandler::new()),
            RetrievalConfig::for_testing().with_window_size(4),
        )
        .unwrap();
        let registry = RetrievalSessionRegistry::new(context);
        let origin = Interest::new(publisher.versioned.clone());
        let session = registry.start_session(origin.clone(), origin).unwrap();

        for n in [2, 0, 1, 3] {
            registry.route(session.id(), vec![publisher.segment(n)], &publisher.interest_for(n));
        }

        assert_eq!(session.current_block(), 4);
        assert_eq!(session.outstanding_segments(), vec![4, 5, 6, 7]);

        let naming = MarkerNaming::new();
        let issued: Vec<u64> = transport
            .expressed_names()
            .iter()
            .filter_map(|name| naming.segment_number(name))
            .collect();
        for early in 0..3 {
            assert!(!issued.contains(&early), "segment {} must not be re-requested", early);
        }
    }

    /// Refused Interests come back once the transport recovers
    #[tokio::test]
    async fn test_transport_outage_recovery() {
        let publisher = Publisher::new(32);
        let transport = Arc::new(RecordingTransport::new());
        let context = RetrievalContext::new(
            transport.clone(),
            Arc::new(MarkerNaming::new()),
            Arc::new(RecordingHandler::new()),
            RetrievalConfig::for_testing().with_window_size(3),
        )
        .unwrap();
        let registry = RetrievalSessionRegistry::new(context);
        let origin = Interest::new(publisher.versioned.clone());
        let session = registry.start_session(origin.clone(), origin.clone()).unwrap();

        transport.set_failing(true);
        registry.route(session.id(), vec![publisher.segment(0)], &origin);
        assert!(session.outstanding_segments().is_empty());
        assert_eq!(session.retry_segments(), vec![1, 2, 3]);

        transport.clear_failures();
        // A duplicate delivery is enough to trigger the next refill.
        registry.route(session.id(), vec![publisher.segment(0)], &origin);
        assert!(session.retry_segments().is_empty());
        assert_eq!(session.outstanding_segments(), vec![1, 2, 3]);
    }

    // =============================================================================
    // INTEGRATION TESTS: LIVENESS
    // =============================================================================

    #[tokio::test]
    async fn test_idle_session_swept_and_cancel_idempotent() {
        let publisher = Publisher::new(8);
        let transport = Arc::new(RecordingTransport::new());
        let context = RetrievalContext::new(
            transport.clone(),
            Arc::new(MarkerNaming::new()),
            Arc::new(RecordingHandler::new()),
            RetrievalConfig::for_testing(),
        )
        .unwrap();
        let registry = Arc::new(RetrievalSessionRegistry::new(context));
        let origin = Interest::new(publisher.versioned.clone());
        let session = registry.start_session(origin.clone(), origin.clone()).unwrap();
        registry.route(session.id(), vec![publisher.segment(0)], &origin);
        let outstanding = session.outstanding_segments().len();

        let swept = registry.sweep_stale(Instant::now() + Duration::from_secs(60));
        assert_eq!(swept, vec![session.id()]);
        assert!(session.is_cancelled());
        assert_eq!(transport.withdrawn().len(), outstanding);

        session.cancel();
        assert!(!registry.cancel(session.id()));
        assert_eq!(transport.withdrawn().len(), outstanding, "nothing withdrawn twice");
    }

    // =============================================================================
    // INTEGRATION TESTS: HANDLER ISOLATION
    // =============================================================================

    #[tokio::test]
    async fn test_failing_handler_does_not_stall_window() {
        let publisher = Publisher::new(16);
        let transport = Arc::new(RecordingTransport::new());
        let handler = Arc::new(RecordingHandler::with_delay(Duration::from_millis(5)));
        handler.fail_name(publisher.segment(1).name().clone());
        let context = RetrievalContext::new(
            transport.clone(),
            Arc::new(MarkerNaming::new()),
            handler.clone(),
            RetrievalConfig::for_testing().with_window_size(2),
        )
        .unwrap();
        let registry = RetrievalSessionRegistry::new(context.clone());
        let origin = Interest::new(publisher.versioned.clone());
        let session = registry.start_session(origin.clone(), origin).unwrap();

        for n in 0..4 {
            registry.route(session.id(), vec![publisher.segment(n)], &publisher.interest_for(n));
        }
        assert_eq!(session.current_block(), 4);
        assert_eq!(session.outstanding_segments(), vec![4, 5]);

        context.dispatcher.drain().await;
        let handled = handler.handled();
        assert_eq!(handled.len(), 3);
        assert!(!handled.contains(publisher.segment(1).name()));
    }
}
