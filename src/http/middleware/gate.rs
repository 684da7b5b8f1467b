//! Gate middleware.
//! Runs the decision sequence before any handler sees the request.

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::gate::{GateDecision, IncomingRequest};
use crate::http::request::request_id;
use crate::http::response::{self, forbidden};
use crate::http::server::AppState;
use crate::observability::{logging, metrics};

pub async fn gate_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let gate = &state.gate;
    let incoming = IncomingRequest::from_parts(req.uri(), req.headers());

    // 1. Decide. A panic here is handled by the failure policy.
    let evaluation = match gate.evaluate_guarded(&incoming) {
        Ok(evaluation) => evaluation,
        Err(e) => {
            tracing::error!(
                request_id = %request_id(&req),
                path = %incoming.path,
                error = %e,
                policy = gate.failure_policy().as_str(),
                "Gate evaluation failed"
            );
            metrics::record_internal_error(gate.failure_policy());
            gate.resolve(Err(e))
        }
    };

    logging::log_evaluation(&incoming, &evaluation);
    metrics::record_decision(&evaluation, start);

    // 2. Answer, or hand over to the handler.
    match response::render(gate, &evaluation.decision) {
        Ok(Some(response)) => response,
        Ok(None) => next.run(req).await,
        Err(e) => {
            tracing::error!(
                request_id = %request_id(&req),
                path = %incoming.path,
                error = %e,
                policy = gate.failure_policy().as_str(),
                "Failed to build gate response"
            );
            metrics::record_internal_error(gate.failure_policy());

            match gate.on_error() {
                GateDecision::Allow => next.run(req).await,
                decision => response::render(gate, &decision)
                    .ok()
                    .flatten()
                    .unwrap_or_else(forbidden),
            }
        }
    }
}
