//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, backend
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_group_hosts` (gauge): hosts per URL prefix
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op, so the gateway
//!   behaves the same with metrics disabled
//! - Labels for prefix, backend, status code

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one proxied request.
pub fn record_request(method: &str, status: u16, backend: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("backend", backend.to_string()),
    ];
    counter!("gateway_requests_total", labels.as_slice()).increment(1);
    histogram!("gateway_request_duration_seconds", labels.as_slice()).record(start.elapsed().as_secs_f64());
}

/// Record the current host count of a group.
pub fn record_group_hosts(url_prefix: &str, hosts: usize) {
    gauge!("gateway_group_hosts", "url_prefix" => url_prefix.to_string()).set(hosts as f64);
}
