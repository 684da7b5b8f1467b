//! Gate outcomes.

use std::fmt;

/// What the gate does with one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Pass through to the normal handler.
    Allow,
    /// Issue the session cookie and redirect to the credential-free URL.
    RedirectWithCookie(String),
    /// Redirect to the configured block destination.
    RedirectToBlock,
    /// Hard refusal (403).
    Deny,
}

impl GateDecision {
    /// Metric / log label.
    pub fn as_str(&self) -> &'static str {
        match self {
            GateDecision::Allow => "allow",
            GateDecision::RedirectWithCookie(_) => "redirect_with_cookie",
            GateDecision::RedirectToBlock => "redirect_to_block",
            GateDecision::Deny => "deny",
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, GateDecision::Allow)
    }
}

impl fmt::Display for GateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which step of the sequence produced the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    DevelopmentBypass,
    ExemptRoute,
    ValidCookie,
    ValidToken,
    InvalidToken,
    MissingCredential,
    InternalError,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::DevelopmentBypass => "development_bypass",
            Reason::ExemptRoute => "exempt_route",
            Reason::ValidCookie => "valid_cookie",
            Reason::ValidToken => "valid_token",
            Reason::InvalidToken => "invalid_token",
            Reason::MissingCredential => "missing_credential",
            Reason::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decision together with the step that made it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub decision: GateDecision,
    pub reason: Reason,
}

impl Evaluation {
    pub fn new(decision: GateDecision, reason: Reason) -> Self {
        Self { decision, reason }
    }
}
