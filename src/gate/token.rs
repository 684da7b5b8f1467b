//! Shared-secret handling and timing-safe comparison.

use std::fmt;

use subtle::ConstantTimeEq;

/// The expected credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretToken(String);

impl SecretToken {
    /// Returns `None` for blank input so an unset secret can never match.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Timing-safe check of a presented credential.
    pub fn matches(&self, candidate: &str) -> bool {
        tokens_match(Some(candidate), Some(&self.0))
    }
}

impl fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretToken(<{} bytes>)", self.0.len())
    }
}

/// Compare two credentials without leaking where they first differ.
///
/// Both operands are walked to the longer length, so neither the matching
/// prefix nor a length mismatch short-circuits. Missing or empty operands
/// never match.
pub fn tokens_match(provided: Option<&str>, expected: Option<&str>) -> bool {
    let (provided, expected) = match (provided, expected) {
        (Some(p), Some(e)) if !p.is_empty() && !e.is_empty() => (p.as_bytes(), e.as_bytes()),
        _ => return false,
    };

    let len = provided.len().max(expected.len());
    let mut equal = (provided.len() as u64).ct_eq(&(expected.len() as u64));

    for i in 0..len {
        let a = provided.get(i).copied().unwrap_or(0);
        let b = expected.get(i).copied().unwrap_or(0);
        equal &= a.ct_eq(&b);
    }

    bool::from(equal)
}
