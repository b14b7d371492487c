//! Gateway metrics and observability.
//!
//! Counters are owned by the application state rather than a global, so each
//! test (and each server instance) observes only its own traffic.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-process gateway counters.
///
/// Shared through `Arc` between the translator and the request handlers.
#[derive(Debug, Default)]
pub struct GatewayMetrics {
    /// Translation calls that reached the engine (identity short-circuits excluded)
    engine_calls: AtomicUsize,

    /// Engine calls that returned an error or timed out
    engine_failures: AtomicUsize,

    /// Auto-detections that fell back to English
    detection_fallbacks: AtomicUsize,

    /// Batch items that produced an error marker
    batch_item_failures: AtomicUsize,

    /// Speech synthesis calls
    synthesis_calls: AtomicUsize,
}

impl GatewayMetrics {
    /// Create a metrics instance with every counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a translation call that reached the engine.
    pub fn record_engine_call(&self) {
        self.engine_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an engine call that failed or timed out.
    pub fn record_engine_failure(&self) {
        self.engine_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an auto-detection that fell back to English.
    pub fn record_detection_fallback(&self) {
        self.detection_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a batch item that produced an error marker.
    pub fn record_batch_item_failure(&self) {
        self.batch_item_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a speech synthesis call.
    pub fn record_synthesis_call(&self) {
        self.synthesis_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current engine call count.
    pub fn engine_calls(&self) -> usize {
        self.engine_calls.load(Ordering::Relaxed)
    }

    /// Get the current engine failure count.
    pub fn engine_failures(&self) -> usize {
        self.engine_failures.load(Ordering::Relaxed)
    }

    /// Get the current detection fallback count.
    pub fn detection_fallbacks(&self) -> usize {
        self.detection_fallbacks.load(Ordering::Relaxed)
    }

    /// Get the current batch item failure count.
    pub fn batch_item_failures(&self) -> usize {
        self.batch_item_failures.load(Ordering::Relaxed)
    }

    /// Get the current synthesis call count.
    pub fn synthesis_calls(&self) -> usize {
        self.synthesis_calls.load(Ordering::Relaxed)
    }

    /// Snapshot of the current counters.
    ///
    /// # Returns
    /// A `MetricsReport` with every counter plus the engine success rate
    /// (0.0 when no engine calls have been made).
    pub fn report(&self) -> MetricsReport {
        let calls = self.engine_calls();
        let failures = self.engine_failures();
        let engine_success_rate = if calls > 0 {
            (calls.saturating_sub(failures) as f64 / calls as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            engine_calls: calls,
            engine_failures: failures,
            engine_success_rate,
            detection_fallbacks: self.detection_fallbacks(),
            batch_item_failures: self.batch_item_failures(),
            synthesis_calls: self.synthesis_calls(),
        }
    }
}

/// Metrics report served under `metrics` in `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub engine_calls: usize,
    pub engine_failures: usize,

    /// Engine success rate as a percentage (0-100)
    pub engine_success_rate: f64,

    pub detection_fallbacks: usize,
    pub batch_item_failures: usize,
    pub synthesis_calls: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_metrics_are_zero() {
        let report = GatewayMetrics::new().report();

        assert_eq!(report.engine_calls, 0);
        assert_eq!(report.engine_failures, 0);
        assert_eq!(report.engine_success_rate, 0.0);
        assert_eq!(report.detection_fallbacks, 0);
        assert_eq!(report.batch_item_failures, 0);
        assert_eq!(report.synthesis_calls, 0);
    }

    #[test]
    fn test_record_counters() {
        let metrics = GatewayMetrics::new();

        metrics.record_engine_call();
        metrics.record_engine_call();
        metrics.record_detection_fallback();
        metrics.record_batch_item_failure();
        metrics.record_synthesis_call();

        assert_eq!(metrics.engine_calls(), 2);
        assert_eq!(metrics.detection_fallbacks(), 1);
        assert_eq!(metrics.batch_item_failures(), 1);
        assert_eq!(metrics.synthesis_calls(), 1);
    }

    #[test]
    fn test_report_engine_success_rate() {
        let metrics = GatewayMetrics::new();

        // 4 calls, 1 failure = 75% success rate
        for _ in 0..4 {
            metrics.record_engine_call();
        }
        metrics.record_engine_failure();

        let report = metrics.report();
        assert_eq!(report.engine_calls, 4);
        assert_eq!(report.engine_failures, 1);
        assert_eq!(report.engine_success_rate, 75.0);
    }

    #[test]
    fn test_report_all_failures() {
        let metrics = GatewayMetrics::new();

        metrics.record_engine_call();
        metrics.record_engine_failure();

        assert_eq!(metrics.report().engine_success_rate, 0.0);
    }

    #[test]
    fn test_instances_are_independent() {
        let first = GatewayMetrics::new();
        let second = GatewayMetrics::new();

        first.record_engine_call();

        assert_eq!(first.engine_calls(), 1);
        assert_eq!(second.engine_calls(), 0);
    }

    #[test]
    fn test_report_serializes() {
        let json = serde_json::to_value(GatewayMetrics::new().report()).unwrap();
        assert!(json.get("engine_calls").is_some());
        assert!(json.get("detection_fallbacks").is_some());
    }
}
