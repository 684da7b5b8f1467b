//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the block destination is an absolute web URL
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Reject allow-list entries that could never match a request path
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("gate.token is set but blank")]
    BlankToken,

    #[error("gate.block_url '{0}' must be an absolute http(s) URL")]
    BlockUrl(String),

    #[error("gate.{field} entry '{value}' must start with '/'")]
    RelativeExemption { field: &'static str, value: String },

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if let Some(token) = &config.gate.token {
        if token.trim().is_empty() {
            errors.push(ValidationError::BlankToken);
        }
    }

    if let Some(block_url) = &config.gate.block_url {
        if !is_web_url(block_url) {
            errors.push(ValidationError::BlockUrl(block_url.clone()));
        }
    }

    for prefix in &config.gate.exempt_prefixes {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::RelativeExemption {
                field: "exempt_prefixes",
                value: prefix.clone(),
            });
        }
    }

    for path in &config.gate.exempt_paths {
        if !path.starts_with('/') {
            errors.push(ValidationError::RelativeExemption {
                field: "exempt_paths",
                value: path.clone(),
            });
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Absolute http(s) URL whose serialization can be sent as `Location`.
fn is_web_url(raw: &str) -> bool {
    match Url::parse(raw.trim()) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host().is_some()
                && HeaderValue::from_str(url.as_str()).is_ok()
        }
        Err(_) => false,
    }
}
