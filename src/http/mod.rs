//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace/timeout/request-id layers)
//!     → middleware/gate.rs (decision sequence)
//!         → response.rs (redirect, cookie, 403), or
//!         → handlers: page.rs (/), status.rs (/debug), /static files
//!     → Send to client
//! ```

pub mod middleware;
pub mod page;
pub mod request;
pub mod response;
pub mod server;
pub mod status;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
