//! # CCN-03 Segment Retrieval Benchmarks
//!
//! - Pure window bookkeeping: retire one segment, plan and record the refill
//! - Full arrival cycle through a session with a recording transport

use ccn_02_interest_matching::Interest;
use ccn_03_segment_retrieval::ports::outbound::{RecordingHandler, RecordingTransport};
use ccn_03_segment_retrieval::{
    MarkerNaming, QueryHandle, RetrievalConfig, RetrievalContext, RetrievalWindow,
    SegmentNaming, SegmentRetrievalSession,
};
use ccn_03_segment_retrieval::domain::OutstandingRequest;
use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use shared_types::{ContentObject, Name};
use std::sync::Arc;
use std::time::Duration;

fn versioned_base(naming: &MarkerNaming) -> Name {
    Name::from_uri("/bench/object").unwrap().append(naming.version_component(1))
}

pub fn bench_window_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("ccn-03/window/cycle");
    group.measurement_time(Duration::from_secs(5));

    let naming = MarkerNaming::new();
    let base = versioned_base(&naming);

    for window_size in [4usize, 32, 256] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::from_parameter(window_size),
            &window_size,
            |b, &window_size| {
                let mut window = RetrievalWindow::new(window_size);
                let mut next_handle = 0u64;
                let mut next_arrival = 0u64;
                b.iter(|| {
                    let name = naming.segment_name(&base, next_arrival);
                    window.retire(next_arrival, &name);
                    next_arrival += 1;
                    for planned in window.plan_refill(|n| naming.segment_name(&base, n)) {
                        next_handle += 1;
                        window.record_issued(
                            planned.segment,
                            planned.name.clone(),
                            OutstandingRequest {
                                interest: Interest::new(planned.name),
                                handle: QueryHandle(next_handle),
                            },
                        );
                    }
                    black_box(window.current_block())
                })
            },
        );
    }

    group.finish();
}

pub fn bench_session_arrival(c: &mut Criterion) {
    let mut group = c.benchmark_group("ccn-03/session/arrival");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap();
    let _enter = runtime.enter();

    let naming = MarkerNaming::new();
    let base = versioned_base(&naming);
    let context = RetrievalContext::new(
        Arc::new(RecordingTransport::new()),
        Arc::new(naming),
        Arc::new(RecordingHandler::new()),
        RetrievalConfig::default().with_window_size(16),
    )
    .unwrap();
    let origin = Interest::new(base.clone());
    let session = SegmentRetrievalSession::new(origin.clone(), origin.clone(), context);

    let mut next = 0u64;
    group.throughput(Throughput::Elements(1));
    group.bench_function("handle_one_segment", |b| {
        b.iter(|| {
            let object = ContentObject::builder(naming.segment_name(&base, next)).build();
            next += 1;
            session.handle_content(vec![object], &origin);
            black_box(session.current_block())
        })
    });

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_window_cycle(c);
    bench_session_arrival(c);
}
