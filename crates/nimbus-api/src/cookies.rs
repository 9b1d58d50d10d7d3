//! Cookie plumbing between HTTP headers and the auth service.

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use nimbus_security::CookieDirective;

/// Value of the named cookie from the request's `Cookie` headers.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// 303 to `location` carrying the cookie directive.
pub fn redirect_with_cookie(location: &str, cookie: &CookieDirective) -> Response {
    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, location.to_string()),
            (header::SET_COOKIE, cookie.to_header_value()),
        ],
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_token_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=abc123; other=1"),
        );
        assert_eq!(session_token(&headers, "session"), Some("abc123".to_string()));
        assert_eq!(session_token(&headers, "missing"), None);
    }

    #[test]
    fn test_empty_session_cookie_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session="));
        assert_eq!(session_token(&headers, "session"), None);
        assert_eq!(session_token(&HeaderMap::new(), "session"), None);
    }
}
