//! Redirect target construction.

use url::form_urlencoded;

use crate::gate::request::CREDENTIAL_PARAM;

/// Rebuild `path?query` without the credential parameter.
///
/// Every other pair is kept, in order, including repeated keys. Leading
/// slashes are collapsed so the target can never become a
/// scheme-relative URL like `//elsewhere.example`.
pub fn strip_credential(path: &str, query: &[(String, String)]) -> String {
    let path = format!("/{}", path.trim_start_matches('/'));

    let mut remaining = query
        .iter()
        .filter(|(k, _)| k != CREDENTIAL_PARAM)
        .peekable();

    if remaining.peek().is_none() {
        return path;
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (k, v) in remaining {
        serializer.append_pair(k, v);
    }

    format!("{}?{}", path, serializer.finish())
}
