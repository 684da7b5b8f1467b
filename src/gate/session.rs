//! Session cookie issuance and validation.
//!
//! The cookie is an opaque marker: holding `creative_session=authorized`
//! is the whole check. It expires through `Max-Age` and has no server-side
//! state to revoke.

use cookie::{Cookie, SameSite};
use time::Duration;

use crate::gate::environment::Environment;

pub const SESSION_COOKIE_NAME: &str = "creative_session";
pub const SESSION_COOKIE_VALUE: &str = "authorized";

/// Three hours.
pub const SESSION_MAX_AGE_SECS: i64 = 3 * 60 * 60;

/// Attributes applied to every issued session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCookiePolicy {
    pub secure: bool,
    pub same_site: SameSite,
}

impl SessionCookiePolicy {
    /// Cookies are `SameSite=Lax` everywhere. Development hosts drop `Secure`
    /// so the flow works over plain HTTP.
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self {
                secure: true,
                same_site: SameSite::Lax,
            },
            Environment::Development => Self {
                secure: false,
                same_site: SameSite::Lax,
            },
        }
    }

    /// Build the cookie set alongside a successful token redirect.
    pub fn issue(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, SESSION_COOKIE_VALUE))
            .path("/")
            .max_age(Duration::seconds(SESSION_MAX_AGE_SECS))
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .build()
    }
}

/// True when the parsed request cookies carry the exact session marker.
pub fn has_session<'a, I>(cookies: I) -> bool
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    cookies
        .into_iter()
        .any(|(name, value)| name == SESSION_COOKIE_NAME && value == SESSION_COOKIE_VALUE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_cookie_attributes() {
        let cookie = SessionCookiePolicy::for_environment(Environment::Production).issue();

        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.value(), SESSION_COOKIE_VALUE);
        assert_eq!(cookie.max_age(), Some(Duration::seconds(10_800)));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));

        let header = cookie.to_string();
        assert!(header.starts_with("creative_session=authorized"));
        assert!(header.contains("Max-Age=10800"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("Secure"));
        assert!(header.contains("SameSite=Lax"));
    }

    #[test]
    fn test_development_cookie_is_relaxed() {
        let cookie = SessionCookiePolicy::for_environment(Environment::Development).issue();
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.http_only(), Some(true));

        // Browsers drop `SameSite=None` without `Secure`.
        let header = cookie.to_string();
        assert!(!header.contains("SameSite=None"));
        assert!(!header.contains("Secure"));
    }

    #[test]
    fn test_has_session_requires_exact_pair() {
        assert!(has_session([("other", "x"), ("creative_session", "authorized")]));
        assert!(!has_session([("creative_session", "Authorized")]));
        assert!(!has_session([("creative_session", "")]));
        assert!(!has_session([("session", "authorized")]));
        assert!(!has_session(std::iter::empty()));
    }
}
