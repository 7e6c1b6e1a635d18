//! Observability infrastructure for the prediction service
//!
//! Prometheus metrics for the prediction pipeline: outcomes, rejected
//! inputs, inference failures, and inference latency.

use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};
use std::sync::OnceLock;

/// Default histogram buckets for inference latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<PredictorMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct PredictorMetricsInner {
    inference_latency_seconds: Histogram,
    predictions_total: IntCounterVec,
    validation_failures_total: IntCounterVec,
    inference_errors_total: IntCounter,
    schema_columns: IntGauge,
}

impl PredictorMetricsInner {
    fn new() -> Self {
        Self {
            inference_latency_seconds: register_histogram!(
                "inclusion_predictor_inference_latency_seconds",
                "Time spent encoding and running model inference per request",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register inference_latency_seconds"),

            predictions_total: register_int_counter_vec!(
                "inclusion_predictor_predictions_total",
                "Predictions served, partitioned by predicted outcome",
                &["outcome"]
            )
            .expect("Failed to register predictions_total"),

            validation_failures_total: register_int_counter_vec!(
                "inclusion_predictor_validation_failures_total",
                "Rejected inputs, partitioned by offending attribute",
                &["attribute"]
            )
            .expect("Failed to register validation_failures_total"),

            inference_errors_total: register_int_counter!(
                "inclusion_predictor_inference_errors_total",
                "Encoder/model contract mismatches observed at the request boundary"
            )
            .expect("Failed to register inference_errors_total"),

            schema_columns: register_int_gauge!(
                "inclusion_predictor_schema_columns",
                "Number of feature columns in the loaded expected schema"
            )
            .expect("Failed to register schema_columns"),
        }
    }
}

/// Predictor metrics for Prometheus exposition
///
/// A lightweight handle to the global metrics instance. Multiple clones
/// share the same underlying metrics.
#[derive(Clone)]
pub struct PredictorMetrics {
    _private: (),
}

impl Default for PredictorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictorMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(PredictorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &PredictorMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record an inference latency observation
    pub fn observe_inference_latency(&self, duration_secs: f64) {
        self.inner().inference_latency_seconds.observe(duration_secs);
    }

    /// Count a served prediction by its outcome label
    pub fn inc_prediction(&self, outcome: &str) {
        self.inner()
            .predictions_total
            .with_label_values(&[outcome])
            .inc();
    }

    /// Count a rejected input by the offending attribute
    pub fn inc_validation_failure(&self, attribute: &str) {
        self.inner()
            .validation_failures_total
            .with_label_values(&[attribute])
            .inc();
    }

    /// Count an inference contract failure
    pub fn inc_inference_error(&self) {
        self.inner().inference_errors_total.inc();
    }

    /// Record the width of the loaded schema
    pub fn set_schema_columns(&self, columns: i64) {
        self.inner().schema_columns.set(columns);
    }
}
