//! Metrics collection and exposition.
//!
//! # Metrics
//! - `wallet_requests_total` (counter): requests by endpoint, status
//! - `wallet_request_duration_seconds` (histogram): latency per endpoint
//! - `wallet_poll_attempts_total` (counter): poll attempts by kind
//! - `wallet_backend_errors_total` (counter): backend failures by operation

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished API request. `endpoint` is the matched route
/// template, never the raw path.
pub fn record_request(endpoint: String, status: u16, start: Instant) {
    counter!(
        "wallet_requests_total",
        "endpoint" => endpoint.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("wallet_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Record one attempt of a polling loop.
pub fn record_poll_attempt(kind: &'static str) {
    counter!("wallet_poll_attempts_total", "kind" => kind).increment(1);
}

/// Record a failed backend operation.
pub fn record_backend_error(op: &'static str) {
    counter!("wallet_backend_errors_total", "op" => op).increment(1);
}
