//! Prometheus metrics for CCN-Core.
//!
//! All metrics follow the naming convention: `ccn_<component>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{exponential_buckets, Counter, Encoder, Gauge, Histogram, HistogramOpts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // INTEREST METRICS
    // =========================================================================

    /// Interests handed to the transport
    pub static ref INTERESTS_EXPRESSED: Counter = Counter::new(
        "ccn_retrieval_interests_expressed_total",
        "Total Interests expressed by retrieval sessions"
    ).expect("metric creation failed");

    /// Interests the transport refused
    pub static ref INTEREST_FAILURES: Counter = Counter::new(
        "ccn_retrieval_interest_failures_total",
        "Total Interest issuances rejected by the transport"
    ).expect("metric creation failed");

    /// Interests withdrawn on cancellation
    pub static ref INTERESTS_WITHDRAWN: Counter = Counter::new(
        "ccn_retrieval_interests_withdrawn_total",
        "Total outstanding Interests withdrawn"
    ).expect("metric creation failed");

    // =========================================================================
    // CONTENT METRICS
    // =========================================================================

    /// Content objects delivered to sessions
    pub static ref CONTENT_RECEIVED: Counter = Counter::new(
        "ccn_retrieval_content_received_total",
        "Total content objects delivered to retrieval sessions"
    ).expect("metric creation failed");

    /// Content handler failures (errors and panics)
    pub static ref HANDLER_FAILURES: Counter = Counter::new(
        "ccn_handler_failures_total",
        "Total content objects the handler failed to process"
    ).expect("metric creation failed");

    /// Content handler latency
    pub static ref HANDLER_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "ccn_handler_duration_seconds",
            "Time spent handling one content object"
        ).buckets(exponential_buckets(0.0001, 2.0, 16).expect("valid buckets"))
    ).expect("metric creation failed");

    // =========================================================================
    // SESSION METRICS
    // =========================================================================

    /// Live retrieval sessions
    pub static ref ACTIVE_SESSIONS: Gauge = Gauge::new(
        "ccn_sessions_active",
        "Number of live retrieval sessions"
    ).expect("metric creation failed");

    /// Sessions cancelled for inactivity
    pub static ref SESSIONS_SWEPT: Counter = Counter::new(
        "ccn_sessions_swept_total",
        "Total sessions cancelled by the staleness sweep"
    ).expect("metric creation failed");

    /// Sessions that saw their final segment
    pub static ref SESSIONS_COMPLETED: Counter = Counter::new(
        "ccn_sessions_completed_total",
        "Total sessions completed by reaching the final segment"
    ).expect("metric creation failed");
}

/// Handle proving the metrics are registered
#[derive(Clone, Debug)]
pub struct MetricsHandle {
    _private: (),
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Interests
        Box::new(INTERESTS_EXPRESSED.clone()),
        Box::new(INTEREST_FAILURES.clone()),
        Box::new(INTERESTS_WITHDRAWN.clone()),
        // Content
        Box::new(CONTENT_RECEIVED.clone()),
        Box::new(HANDLER_FAILURES.clone()),
        Box::new(HANDLER_DURATION.clone()),
        // Sessions
        Box::new(ACTIVE_SESSIONS.clone()),
        Box::new(SESSIONS_SWEPT.clone()),
        Box::new(SESSIONS_COMPLETED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle { _private: () })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
