//! Hosting environment classification.
//!
//! Resolved once at startup from marker variables that only exist on
//! development hosts. Request content never influences it.

use std::fmt;

/// Where the process is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Classify using the given lookup. Any marker with a non-empty value
    /// means development.
    pub fn detect<F>(markers: &[String], lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let marked = markers
            .iter()
            .any(|name| lookup(name).is_some_and(|v| !v.is_empty()));

        if marked {
            Environment::Development
        } else {
            Environment::Production
        }
    }

    /// Classify from the current process environment.
    pub fn from_process(markers: &[String]) -> Self {
        Self::detect(markers, |name| std::env::var(name).ok())
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// Label reported by the status endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "DEVELOPMENT",
            Environment::Production => "PRODUCTION",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
