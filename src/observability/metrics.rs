//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by route, method, status
//! - `proxy_request_duration_seconds` (histogram): latency by route, method
//! - `proxy_upstream_errors_total` (counter): transport/decode failures by route
//!
//! Requests that match no route are labelled `route="none"`.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_request(route: &'static str, method: &str, status: u16, start: Instant) {
    let method = method.to_string();

    counter!(
        "proxy_requests_total",
        "route" => route,
        "method" => method.clone(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "proxy_request_duration_seconds",
        "route" => route,
        "method" => method
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record an upstream call that failed without an API error response.
pub fn record_upstream_error(route: &'static str) {
    counter!("proxy_upstream_errors_total", "route" => route).increment(1);
}
