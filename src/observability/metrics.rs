//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_decisions_total` (counter): decisions by outcome and reason
//! - `gate_internal_errors_total` (counter): gate failures by policy
//! - `gate_decision_duration_seconds` (histogram): time spent deciding

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::config::FailurePolicy;
use crate::gate::Evaluation;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_decision(evaluation: &Evaluation, start: Instant) {
    metrics::counter!(
        "gate_decisions_total",
        "decision" => evaluation.decision.as_str(),
        "reason" => evaluation.reason.as_str()
    )
    .increment(1);
    metrics::histogram!("gate_decision_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_internal_error(policy: FailurePolicy) {
    metrics::counter!("gate_internal_errors_total", "policy" => policy.as_str()).increment(1);
}
