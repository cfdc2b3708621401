//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define gateway metrics (requests, latency, breaker transitions)
//! - Expose Prometheus-compatible metrics endpoint
//! - Track per-upstream and aggregate metrics
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by mode, status, upstream
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_breaker_transitions_total` (counter): breaker transitions by upstream, state
//! - `gateway_breaker_open` (gauge): 1=open, 0=closed
//!
//! # Design Decisions
//! - Metric calls are no-ops until a recorder is installed
//! - Labels for mode, upstream, status code

use std::net::SocketAddr;
use std::time::Instant;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::resilience::BreakerState;

/// Install the Prometheus recorder with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed request.
pub fn record_request(mode: &'static str, status: u16, upstream: &str, start: Instant) {
    counter!(
        "gateway_requests_total",
        "mode" => mode,
        "status" => status.to_string(),
        "upstream" => upstream.to_string()
    )
    .increment(1);
    histogram!(
        "gateway_request_duration_seconds",
        "mode" => mode,
        "upstream" => upstream.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a breaker state change.
pub fn record_breaker_transition(upstream: &str, state: BreakerState) {
    counter!(
        "gateway_breaker_transitions_total",
        "upstream" => upstream.to_string(),
        "state" => state.as_str()
    )
    .increment(1);
    let open = if state == BreakerState::Open { 1.0 } else { 0.0 };
    gauge!("gateway_breaker_open", "upstream" => upstream.to_string()).set(open);
}
