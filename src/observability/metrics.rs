//! Metrics collection and exposition.
//!
//! # Metrics
//! - `submitter_transactions_total` (counter): executions by outcome
//! - `submitter_rpc_errors_total` (counter): node failures by method, kind
//! - `submitter_receipt_poll_attempts` (histogram): queries until a verdict

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one finished `execute` call.
pub fn record_transaction(outcome: &'static str) {
    counter!("submitter_transactions_total", "outcome" => outcome).increment(1);
}

/// Count one failed node call.
pub fn record_rpc_error(method: &'static str, kind: &'static str) {
    counter!("submitter_rpc_errors_total", "method" => method, "kind" => kind).increment(1);
}

pub fn record_poll_attempts(attempts: u32) {
    histogram!("submitter_receipt_poll_attempts").record(attempts as f64);
}
