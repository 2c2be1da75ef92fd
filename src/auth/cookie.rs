//! `auth-token` cookie framing.
//!
//! The session token itself knows nothing about cookies; this module only
//! reads it out of the `Cookie` header and builds the `Set-Cookie` value.

use axum::http::{header, HeaderMap};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "auth-token";

/// Find a cookie value across all `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
}

/// `Set-Cookie` value that stores the session token.
pub fn session_cookie(token: &str, max_age_secs: u64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(values: &[&'static str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for v in values {
            headers.append(header::COOKIE, HeaderValue::from_static(v));
        }
        headers
    }

    #[test]
    fn test_cookie_value_found() {
        let h = headers(&["theme=dark; auth-token=abc.def.ghi; lang=en"]);
        assert_eq!(cookie_value(&h, SESSION_COOKIE), Some("abc.def.ghi"));
    }

    #[test]
    fn test_cookie_value_across_headers() {
        let h = headers(&["theme=dark", "auth-token=xyz"]);
        assert_eq!(cookie_value(&h, SESSION_COOKIE), Some("xyz"));
    }

    #[test]
    fn test_cookie_value_missing() {
        let h = headers(&["auth-token-old=1; other=2"]);
        assert_eq!(cookie_value(&h, SESSION_COOKIE), None);
        assert_eq!(cookie_value(&HeaderMap::new(), SESSION_COOKIE), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok", 604_800, true);
        assert_eq!(
            cookie,
            "auth-token=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=604800; Secure"
        );
    }

    #[test]
    fn test_clear_cookie() {
        let cookie = clear_session_cookie(false);
        assert_eq!(cookie, "auth-token=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    }
}
