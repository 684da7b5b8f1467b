//! Diagnostic status endpoint.
//!
//! Reports whether the gate is configured without revealing any secret.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::gate::Gate;
use crate::http::server::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateStatus {
    pub environment: &'static str,
    pub cloaker_active: bool,
    pub token_configured: bool,
    pub block_url_configured: bool,
}

impl GateStatus {
    pub fn from_gate(gate: &Gate) -> Self {
        Self {
            environment: gate.environment().as_str(),
            cloaker_active: gate.is_active(),
            token_configured: gate.token_configured(),
            block_url_configured: gate.block_url().is_some(),
        }
    }
}

/// `GET /debug`
pub async fn get_status(State(state): State<AppState>) -> Json<GateStatus> {
    Json(GateStatus::from_gate(&state.gate))
}
