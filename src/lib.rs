//! Token-gated landing page library.

pub mod config;
pub mod gate;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::AppConfig;
pub use gate::{Gate, GateDecision};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
