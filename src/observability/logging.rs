//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Emit one decision event per gated request
//!
//! # Design Decisions
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` overrides the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};
use crate::gate::{Evaluation, GateDecision, IncomingRequest};

/// Install the global subscriber.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("link_cloak={},tower_http={}", config.log_level, config.log_level).into()
    });

    let json = config.log_format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

/// Report a gate decision. Never logs the presented credential.
pub fn log_evaluation(req: &IncomingRequest, evaluation: &Evaluation) {
    let utm = req
        .utm_params()
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    match &evaluation.decision {
        GateDecision::Allow => tracing::debug!(
            decision = %evaluation.decision,
            reason = %evaluation.reason,
            path = %req.path,
            "Access allowed"
        ),
        GateDecision::RedirectWithCookie(target) => tracing::info!(
            decision = %evaluation.decision,
            reason = %evaluation.reason,
            path = %req.path,
            target = %target,
            utm = %utm,
            "Valid token, issuing session cookie"
        ),
        GateDecision::RedirectToBlock | GateDecision::Deny => tracing::info!(
            decision = %evaluation.decision,
            reason = %evaluation.reason,
            path = %req.path,
            utm = %utm,
            "Access blocked"
        ),
    }
}
