//! Read-only view of an inbound request, as the gate sees it.

use axum::http::{header, HeaderMap, Uri};
use cookie::Cookie;
use url::form_urlencoded;

/// Query parameter carrying the shared secret on tracked links.
pub const CREDENTIAL_PARAM: &str = "creative";

/// Prefix of campaign-tracking parameters.
pub const UTM_PREFIX: &str = "utm_";

/// Path, decoded query pairs and cookies of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomingRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub cookies: Vec<(String, String)>,
}

impl IncomingRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Extract the gate-relevant parts of an HTTP request.
    ///
    /// Cookie headers that are not valid UTF-8, and cookie pairs that fail to
    /// parse, are skipped.
    pub fn from_parts(uri: &Uri, headers: &HeaderMap) -> Self {
        let query = uri
            .query()
            .map(|q| {
                form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let cookies = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|raw| {
                Cookie::split_parse(raw)
                    .filter_map(Result::ok)
                    .map(|c| (c.name().to_string(), c.value().to_string()))
                    .collect::<Vec<_>>()
            })
            .collect();

        Self {
            path: uri.path().to_string(),
            query,
            cookies,
        }
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    /// First value of a query parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// The presented credential, trimmed. Blank values count as absent.
    pub fn credential(&self) -> Option<&str> {
        self.query_param(CREDENTIAL_PARAM)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    pub fn cookie_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cookies.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Campaign-tracking parameters, for logging only.
    pub fn utm_params(&self) -> Vec<(&str, &str)> {
        self.query
            .iter()
            .filter(|(k, _)| k.starts_with(UTM_PREFIX))
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}
