//! Route allow-list matching.
//!
//! # Responsibilities
//! - Match path prefixes (static assets, API, font/asset namespaces)
//! - Match exact paths (favicon, robots file, diagnostics)
//! - Combine conditions with OR semantics
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Prefix matching is plain `starts_with`; `/static` without the trailing
//!   slash is a different namespace from `/static/`
//! - No regex to guarantee O(n) matching

use crate::config::GateConfig;

/// Trait for matching request paths against an exemption.
pub trait PathMatcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path is covered by this exemption.
    fn matches(&self, path: &str) -> bool;
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl PathMatcher for PathPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// Matches one exact path.
#[derive(Debug, Clone)]
pub struct ExactPathMatcher {
    path: String,
}

impl ExactPathMatcher {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl PathMatcher for ExactPathMatcher {
    fn matches(&self, path: &str) -> bool {
        path == self.path
    }
}

/// Paths that bypass the gate entirely.
#[derive(Debug)]
pub struct ExemptRoutes {
    matchers: Vec<Box<dyn PathMatcher>>,
}

impl ExemptRoutes {
    pub fn new(matchers: Vec<Box<dyn PathMatcher>>) -> Self {
        Self { matchers }
    }

    /// Build the allow-list from `gate.exempt_prefixes` and `gate.exempt_paths`.
    pub fn from_config(config: &GateConfig) -> Self {
        let prefixes = config
            .exempt_prefixes
            .iter()
            .map(|p| Box::new(PathPrefixMatcher::new(p.clone())) as Box<dyn PathMatcher>);
        let exact = config
            .exempt_paths
            .iter()
            .map(|p| Box::new(ExactPathMatcher::new(p.clone())) as Box<dyn PathMatcher>);

        Self::new(prefixes.chain(exact).collect())
    }

    /// Any matcher passing exempts the path (OR).
    pub fn is_exempt(&self, path: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_prefix_matcher() {
        let matcher = PathPrefixMatcher::new("/api/");
        assert!(matcher.matches("/api/v1"));
        assert!(!matcher.matches("/api"));
        assert!(!matcher.matches("/API/v1"));
    }

    #[test]
    fn test_exact_matcher() {
        let matcher = ExactPathMatcher::new("/robots.txt");
        assert!(matcher.matches("/robots.txt"));
        assert!(!matcher.matches("/robots.txt/extra"));
    }

    #[test]
    fn test_default_allow_list() {
        let routes = ExemptRoutes::from_config(&GateConfig::default());

        for path in [
            "/static/app.css",
            "/api/health",
            "/assets/logo.png",
            "/fonts/inter.woff2",
            "/favicon.ico",
            "/robots.txt",
            "/debug",
        ] {
            assert!(routes.is_exempt(path), "{} should be exempt", path);
        }

        for path in ["/", "/index.html", "/debug/x", "/staticfile", "/favicon.ico.bak"] {
            assert!(!routes.is_exempt(path), "{} should be gated", path);
        }
    }
}
