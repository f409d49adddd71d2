//! Metrics collection and exposition.
//!
//! # Metrics
//! - `wol_http_requests_total` (counter): requests by method, route, status
//! - `wol_http_request_duration_seconds` (histogram): latency distribution
//! - `wol_wake_outcomes_total` (counter): pipeline outcomes by code
//! - `wol_auth_failures_total` (counter): rejected credentials by source IP
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    ::metrics::describe_counter!(
        "wol_http_requests_total",
        "HTTP requests by method, route and status"
    );
    ::metrics::describe_histogram!("wol_http_request_duration_seconds", "HTTP request latency");
    ::metrics::describe_counter!(
        "wol_wake_outcomes_total",
        "Wake pipeline outcomes by response code"
    );
    ::metrics::describe_counter!(
        "wol_auth_failures_total",
        "Rejected credentials by source address; feeds external rate limiting"
    );

    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(method: &str, route: &'static str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    ::metrics::counter!("wol_http_requests_total", &labels).increment(1);
    ::metrics::histogram!("wol_http_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_wake_outcome(code: &'static str) {
    ::metrics::counter!("wol_wake_outcomes_total", "code" => code).increment(1);
}

/// Observability hook for invalid-key attempts. Nothing is throttled here.
pub fn record_auth_failure(source: &str) {
    tracing::info!(source = %source, "Rate limit tracking: invalid key attempt from IP");
    ::metrics::counter!("wol_auth_failures_total", "source" => source.to_string()).increment(1);
}
