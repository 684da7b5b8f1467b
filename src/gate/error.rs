//! Gate error definitions.

use std::any::Any;

use axum::http::header::InvalidHeaderValue;
use thiserror::Error;

/// Unexpected failures inside the gate. None of these reach the visitor;
/// the configured failure policy decides what they see instead.
#[derive(Debug, Error)]
pub enum GateError {
    /// A redirect or cookie header could not be encoded.
    #[error("invalid response header: {0}")]
    Header(#[from] InvalidHeaderValue),

    /// The response builder rejected the response.
    #[error("failed to build response: {0}")]
    Response(#[from] axum::http::Error),

    /// The decision logic panicked.
    #[error("decision panicked: {0}")]
    Panicked(String),
}

impl GateError {
    /// Convert a `catch_unwind` payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        GateError::Panicked(message)
    }
}
