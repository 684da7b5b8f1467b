//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gate middleware produces, per request:
//!     → logging.rs (one structured event keyed by decision)
//!     → metrics.rs (decision counters, latency histogram)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Decisions are computed first, then reported; the gate never logs
//! - Request ID is recorded on the trace span of every request
//!   (`http::request::request_span`)
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
