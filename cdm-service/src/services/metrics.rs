//! Prometheus metrics for cdm-service.
//!
//! HTTP request metrics come from `service_core::middleware::metrics`; this
//! module adds model-call metrics and owns the exporter handle.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder once per process.
///
/// Later calls are no-ops, so test binaries may build several applications.
pub fn init_metrics() {
    METRICS_HANDLE.get_or_init(|| {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        if metrics::set_global_recorder(recorder).is_err() {
            tracing::warn!("A global metrics recorder was already installed");
        }
        handle
    });
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Record one remote model call.
pub fn record_model_call(operation: &'static str, success: bool, elapsed: Duration) {
    let status = if success { "ok" } else { "error" };
    counter!("cdm_model_requests_total", "operation" => operation, "status" => status)
        .increment(1);
    histogram!("cdm_model_latency_seconds", "operation" => operation)
        .record(elapsed.as_secs_f64());
}

/// Record sources appended to a chat answer.
pub fn record_verified_sources(count: usize) {
    counter!("cdm_verified_sources_total").increment(count as u64);
}

/// Record a mapping response that fell back to an empty array.
pub fn record_mapping_fallback() {
    counter!("cdm_mapping_fallbacks_total").increment(1);
}
