//! Metrics collection and exposition.
//!
//! # Metrics
//! - `noui_requests_total` (counter): API requests by method, status
//! - `noui_request_duration_seconds` (histogram): latency distribution
//! - `noui_rate_limited_total` (counter): denials by path
//! - `noui_rate_limit_tracked_keys` (gauge): size of the window table
//! - `noui_submissions_total` (counter): stored records by kind
//!
//! Without an installed recorder every call here is a no-op, so tests and
//! metrics-disabled deployments pay nothing.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "noui_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("noui_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limited(path: &str) {
    counter!("noui_rate_limited_total", "path" => path.to_string()).increment(1);
}

pub fn record_tracked_keys(count: usize) {
    gauge!("noui_rate_limit_tracked_keys").set(count as f64);
}

pub fn record_submission(kind: &'static str) {
    counter!("noui_submissions_total", "kind" => kind).increment(1);
}
