//! Token gate subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → request.rs (path, query pairs, cookies)
//!     → Gate::evaluate, first match wins:
//!         1. development bypass      → Allow
//!         2. routes.rs allow-list    → Allow
//!         3. session.rs cookie check → Allow
//!         4. token.rs credential     → RedirectWithCookie (redirect.rs target)
//!                                      or refusal
//!         5. nothing presented       → refusal
//!     → GateDecision
//! ```
//!
//! Refusal is `RedirectToBlock` when a block URL is configured, `Deny`
//! otherwise.
//!
//! # Design Decisions
//! - The decision is a pure function of the request and the startup config
//! - No shared mutable state; one `Gate` is shared via Arc by every request
//! - Errors never surface to visitors; `FailurePolicy` decides the outcome

pub mod decision;
pub mod environment;
pub mod error;
pub mod redirect;
pub mod request;
pub mod routes;
pub mod session;
pub mod token;

use std::panic::{catch_unwind, AssertUnwindSafe};

use url::Url;

use crate::config::{FailurePolicy, GateConfig};

pub use self::decision::{Evaluation, GateDecision, Reason};
pub use self::environment::Environment;
pub use self::error::GateError;
pub use self::request::IncomingRequest;
pub use self::routes::ExemptRoutes;
pub use self::session::{SessionCookiePolicy, SESSION_COOKIE_NAME, SESSION_COOKIE_VALUE};
pub use self::token::SecretToken;

/// The request gate. Immutable after construction.
#[derive(Debug)]
pub struct Gate {
    token: Option<SecretToken>,
    block_url: Option<String>,
    environment: Environment,
    enforce_in_development: bool,
    exempt: ExemptRoutes,
    cookie_policy: SessionCookiePolicy,
    failure_policy: FailurePolicy,
}

impl Gate {
    /// Build the gate from validated configuration.
    ///
    /// The block URL is kept in its parsed serialization, which is always a
    /// valid `Location` value. One that does not parse is treated as absent,
    /// so refusals fall back to 403 rather than a broken redirect.
    pub fn new(config: &GateConfig, environment: Environment) -> Self {
        let block_url = config
            .block_url
            .as_deref()
            .and_then(|raw| match Url::parse(raw.trim()) {
                Ok(url) => Some(String::from(url)),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring unparseable block URL");
                    None
                }
            });

        Self {
            token: config.token.clone().and_then(SecretToken::new),
            block_url,
            environment,
            enforce_in_development: config.enforce_in_development,
            exempt: ExemptRoutes::from_config(config),
            cookie_policy: SessionCookiePolicy::for_environment(environment),
            failure_policy: config.failure_policy,
        }
    }

    /// Run the decision sequence.
    pub fn evaluate(&self, req: &IncomingRequest) -> Evaluation {
        if !self.is_active() {
            return Evaluation::new(GateDecision::Allow, Reason::DevelopmentBypass);
        }

        if self.exempt.is_exempt(&req.path) {
            return Evaluation::new(GateDecision::Allow, Reason::ExemptRoute);
        }

        if session::has_session(req.cookie_pairs()) {
            return Evaluation::new(GateDecision::Allow, Reason::ValidCookie);
        }

        match req.credential() {
            Some(presented) => {
                let valid = self
                    .token
                    .as_ref()
                    .is_some_and(|expected| expected.matches(presented));

                if valid {
                    let target = redirect::strip_credential(&req.path, &req.query);
                    Evaluation::new(GateDecision::RedirectWithCookie(target), Reason::ValidToken)
                } else {
                    Evaluation::new(self.refusal(), Reason::InvalidToken)
                }
            }
            None => Evaluation::new(self.refusal(), Reason::MissingCredential),
        }
    }

    /// Decision only.
    pub fn decide(&self, req: &IncomingRequest) -> GateDecision {
        self.evaluate(req).decision
    }

    /// `evaluate` with panics captured as `GateError::Panicked`.
    pub fn evaluate_guarded(&self, req: &IncomingRequest) -> Result<Evaluation, GateError> {
        catch_unwind(AssertUnwindSafe(|| self.evaluate(req))).map_err(GateError::from_panic)
    }

    /// Collapse a fallible evaluation using the failure policy.
    pub fn resolve(&self, result: Result<Evaluation, GateError>) -> Evaluation {
        match result {
            Ok(evaluation) => evaluation,
            Err(_) => Evaluation::new(self.on_error(), Reason::InternalError),
        }
    }

    /// Outcome for a request the gate could not evaluate.
    pub fn on_error(&self) -> GateDecision {
        match self.failure_policy {
            FailurePolicy::FailOpen => GateDecision::Allow,
            FailurePolicy::FailClosed => self.refusal(),
        }
    }

    /// Outcome for an unauthorized request.
    pub fn refusal(&self) -> GateDecision {
        if self.block_url.is_some() {
            GateDecision::RedirectToBlock
        } else {
            GateDecision::Deny
        }
    }

    /// False on development hosts unless enforcement is forced on.
    pub fn is_active(&self) -> bool {
        !self.environment.is_development() || self.enforce_in_development
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn block_url(&self) -> Option<&str> {
        self.block_url.as_deref()
    }

    pub fn token_configured(&self) -> bool {
        self.token.is_some()
    }

    pub fn cookie_policy(&self) -> &SessionCookiePolicy {
        &self.cookie_policy
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Install a block URL without normalization, so response building can
    /// be made to fail.
    #[cfg(test)]
    pub(crate) fn with_raw_block_url(mut self, raw: &str) -> Self {
        self.block_url = Some(raw.to_string());
        self
    }
}
