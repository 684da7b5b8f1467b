//! Gate decisions as HTTP responses.
//!
//! # Responsibilities
//! - 302 + `Set-Cookie` for a valid token, in one response
//! - 302 to the block destination
//! - Minimal 403 when no block destination exists
//!
//! # Design Decisions
//! - Responses never include a body that hints at what is protected
//! - Gate responses are `Cache-Control: no-store` so a redirect issued to
//!   one visitor is never replayed to another

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::gate::{Gate, GateDecision, GateError};

/// Body of the hard refusal.
pub const FORBIDDEN_BODY: &str = "Forbidden";

/// Build the response for a decision. `Allow` has none; the request goes on
/// to its handler.
pub fn render(gate: &Gate, decision: &GateDecision) -> Result<Option<Response>, GateError> {
    let response = match decision {
        GateDecision::Allow => return Ok(None),
        GateDecision::RedirectWithCookie(target) => {
            let cookie = gate.cookie_policy().issue();
            Response::builder()
                .status(StatusCode::FOUND)
                .header(header::LOCATION, HeaderValue::from_str(target)?)
                .header(header::SET_COOKIE, HeaderValue::from_str(&cookie.to_string())?)
                .header(header::CACHE_CONTROL, "no-store")
                .body(Body::empty())?
        }
        GateDecision::RedirectToBlock => match gate.block_url() {
            Some(url) => redirect(url)?,
            None => forbidden(),
        },
        GateDecision::Deny => forbidden(),
    };

    Ok(Some(response))
}

fn redirect(location: &str) -> Result<Response, GateError> {
    Ok(Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, HeaderValue::from_str(location)?)
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::empty())?)
}

/// The last-resort refusal; cannot fail.
pub fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        [(header::CACHE_CONTROL, "no-store")],
        FORBIDDEN_BODY,
    )
        .into_response()
}
