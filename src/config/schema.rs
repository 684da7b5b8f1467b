//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gated site.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Token gate settings.
    pub gate: GateConfig,

    /// Protected page and static assets.
    pub site: SiteConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// What the gate does when its own logic fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Serve the page anyway. Availability wins over secrecy.
    #[default]
    FailOpen,
    /// Treat the request as unauthorized.
    FailClosed,
}

impl FailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailurePolicy::FailOpen => "fail_open",
            FailurePolicy::FailClosed => "fail_closed",
        }
    }
}

/// Token gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GateConfig {
    /// Shared secret expected in the `creative` query parameter.
    pub token: Option<String>,

    /// Where unauthorized visitors are sent. Without it they get a 403.
    pub block_url: Option<String>,

    /// Behaviour on internal gate errors.
    pub failure_policy: FailurePolicy,

    /// Path prefixes that are never gated.
    pub exempt_prefixes: Vec<String>,

    /// Exact paths that are never gated.
    pub exempt_paths: Vec<String>,

    /// Environment variables whose presence marks a development host.
    pub development_markers: Vec<String>,

    /// Keep the gate active on development hosts.
    pub enforce_in_development: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            token: None,
            block_url: None,
            failure_policy: FailurePolicy::default(),
            exempt_prefixes: ["/static/", "/api/", "/assets/", "/fonts/"]
                .into_iter()
                .map(String::from)
                .collect(),
            exempt_paths: ["/favicon.ico", "/robots.txt", "/debug"]
                .into_iter()
                .map(String::from)
                .collect(),
            development_markers: vec!["REPL_ID".to_string(), "REPL_SLUG".to_string()],
            enforce_in_development: false,
        }
    }
}

/// Protected page configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// HTML file served on `/`. A built-in page is used when unset.
    pub index_path: Option<String>,

    /// Directory served under `/static`.
    pub static_dir: String,

    /// Title of the built-in page.
    pub title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            index_path: None,
            static_dir: "static".to_string(),
            title: "Welcome".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
