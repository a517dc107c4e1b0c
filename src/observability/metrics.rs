//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_transactions_total` (counter): transactions by outcome
//! - `proxy_transaction_duration_seconds` (histogram): accept-to-close latency
//! - `proxy_relayed_bytes_total` (counter): origin bytes sent to clients
//! - `proxy_active_connections` (gauge): client connections being served

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with an HTTP listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a finished transaction.
pub fn record_transaction(outcome: &'static str, started: Instant) {
    metrics::counter!("proxy_transactions_total", "outcome" => outcome).increment(1);
    metrics::histogram!("proxy_transaction_duration_seconds", "outcome" => outcome)
        .record(started.elapsed().as_secs_f64());
}

pub fn record_relayed_bytes(bytes: usize) {
    metrics::counter!("proxy_relayed_bytes_total").increment(bytes as u64);
}

pub fn set_active_connections(active: u64) {
    metrics::gauge!("proxy_active_connections").set(active as f64);
}
