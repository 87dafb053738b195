//! Prometheus metrics exposition
//!
//! - `relay_callbacks_total` (counter): label `outcome`
//! - `relay_callback_duration_seconds` (histogram): label `outcome`
//! - `relay_upstream_errors_total` (counter): labels `stage`, `error_type`
//! - `relay_redirects_total` (counter)
//!
//! Plain atomic counters back the `/health` endpoint.

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

const CALLBACK_DURATION: &str = "relay_callback_duration_seconds";

/// Covers 5ms to 30s: three serial provider calls, each bounded by the
/// outbound timeout.
const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
];

/// Request counters reported by `/health`.
#[derive(Debug, Clone)]
pub struct RequestCounters {
    pub callbacks_total: Arc<AtomicU64>,
    pub rejections_total: Arc<AtomicU64>,
    pub errors_total: Arc<AtomicU64>,
    pub started_at: Instant,
}

impl Default for RequestCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestCounters {
    pub fn new() -> Self {
        Self {
            callbacks_total: Arc::new(AtomicU64::new(0)),
            rejections_total: Arc::new(AtomicU64::new(0)),
            errors_total: Arc::new(AtomicU64::new(0)),
            started_at: Instant::now(),
        }
    }
}

fn builder() -> Result<PrometheusBuilder, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(CALLBACK_DURATION.to_string()), DURATION_BUCKETS)
}

/// Install the Prometheus recorder and return a handle for rendering metrics.
///
/// The callback duration is configured with explicit buckets so it renders
/// as a histogram (`_bucket` lines) rather than the default summary.
pub fn install_recorder() -> anyhow::Result<PrometheusHandle> {
    Ok(builder()?.install_recorder()?)
}

/// Record a finished callback with its outcome label.
pub fn record_callback(outcome: &'static str, duration_secs: f64) {
    metrics::counter!("relay_callbacks_total", "outcome" => outcome).increment(1);
    metrics::histogram!(CALLBACK_DURATION, "outcome" => outcome).record(duration_secs);
}

/// Record a failed call against the identity provider.
pub fn record_upstream_error(stage: &'static str, error_type: &'static str) {
    metrics::counter!("relay_upstream_errors_total", "stage" => stage, "error_type" => error_type)
        .increment(1);
}

/// Record a redirect to the authorization endpoint.
pub fn record_redirect() {
    metrics::counter!("relay_redirects_total").increment(1);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusRecorder;

    /// Isolated recorder/handle pair. `build_recorder()` avoids the global
    /// singleton, which panics when installed twice in one process.
    pub(crate) fn isolated_recorder() -> (PrometheusRecorder, PrometheusHandle) {
        let recorder = builder().unwrap().build_recorder();
        let handle = recorder.handle();
        (recorder, handle)
    }

    #[test]
    fn record_functions_do_not_panic_without_recorder() {
        record_callback("issued", 0.05);
        record_upstream_error("token_exchange", "timeout");
        record_redirect();
    }

    #[test]
    fn record_callback_increments_counter_and_histogram() {
        let (recorder, handle) = isolated_recorder();
        let _guard = metrics::set_default_local_recorder(&recorder);

        record_callback("issued", 0.042);
        record_callback("forbidden", 0.3);

        let output = handle.render();
        assert!(output.contains("relay_callbacks_total"));
        assert!(output.contains("outcome=\"issued\""));
        assert!(output.contains("outcome=\"forbidden\""));
        assert!(
            output.contains("relay_callback_duration_seconds_bucket"),
            "histogram must render _bucket lines"
        );
        assert!(output.contains("le=\"0.005\""));
        assert!(output.contains("le=\"30\""));
    }

    #[test]
    fn record_upstream_error_carries_stage_and_type() {
        let (recorder, handle) = isolated_recorder();
        let _guard = metrics::set_default_local_recorder(&recorder);

        record_upstream_error("hosted_domain_lookup", "userinfo");
        record_redirect();

        let output = handle.render();
        assert!(output.contains("relay_upstream_errors_total"));
        assert!(output.contains("stage=\"hosted_domain_lookup\""));
        assert!(output.contains("error_type=\"userinfo\""));
        assert!(output.contains("relay_redirects_total"));
    }

    #[test]
    fn counters_start_at_zero() {
        use std::sync::atomic::Ordering;
        for counters in [RequestCounters::new(), RequestCounters::default()] {
            assert_eq!(counters.callbacks_total.load(Ordering::Relaxed), 0);
            assert_eq!(counters.rejections_total.load(Ordering::Relaxed), 0);
            assert_eq!(counters.errors_total.load(Ordering::Relaxed), 0);
        }
    }
}
