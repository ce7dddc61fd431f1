//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define service metrics (requests, latency, upstream calls, rate limiting)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `employee_api_requests_total` (counter): requests by method, status
//! - `employee_api_request_duration_seconds` (histogram): latency distribution
//! - `employee_api_upstream_calls_total` (counter): upstream calls by operation, outcome
//! - `employee_api_rate_limited_total` (counter): rejected requests
//!
//! # Design Decisions
//! - Recording without an installed recorder is a no-op, so tests need no setup
//! - Labels are low-cardinality (no ids, no names)

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed inbound request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let status = status.to_string();
    counter!(
        "employee_api_requests_total",
        "method" => method.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    histogram!(
        "employee_api_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one upstream call and how it ended.
pub fn record_upstream_call(operation: &'static str, outcome: &'static str) {
    counter!(
        "employee_api_upstream_calls_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a request rejected by the rate limiter.
pub fn record_rate_limited() {
    counter!("employee_api_rate_limited_total").increment(1);
}
