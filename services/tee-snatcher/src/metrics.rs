//! Prometheus metrics exposition
//!
//! Counters emitted by the monitor loop:
//!
//! - `tee_snatcher_checks_total` (counter): one per polling tick
//! - `tee_snatcher_tee_time_queries_total` (counter): label `outcome`
//! - `tee_snatcher_candidates_found_total` (counter)
//! - `tee_snatcher_bookings_total` (counter): label `outcome`
//!
//! Without an installed recorder every call is a no-op.

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the global Prometheus recorder with its own `/metrics` listener.
///
/// Must be called from inside the tokio runtime.
pub fn install_exporter(listen_addr: SocketAddr) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(listen_addr)
        .install()
        .with_context(|| format!("failed to install Prometheus exporter on {listen_addr}"))
}

/// Record one polling tick.
pub fn record_check() {
    metrics::counter!("tee_snatcher_checks_total").increment(1);
}

/// Record one tee time search, `outcome` is `ok` or `error`.
pub fn record_query(outcome: &'static str) {
    metrics::counter!("tee_snatcher_tee_time_queries_total", "outcome" => outcome).increment(1);
}

pub fn record_candidate() {
    metrics::counter!("tee_snatcher_candidates_found_total").increment(1);
}

/// Record a booking attempt: `confirmed`, `simulated`, `rejected` or `error`.
pub fn record_booking(outcome: &'static str) {
    metrics::counter!("tee_snatcher_bookings_total", "outcome" => outcome).increment(1);
}
