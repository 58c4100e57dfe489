//! CORS configuration for the HTTP keyword transport
//!
//! A keyword server drives a real browser on the local machine, so the HTTP
//! transport only accepts localhost origins: `localhost`, `127.0.0.1`, and
//! `[::1]` on any port, over http or https.

use http::{header::HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use url::Url;

/// Allowed headers for the keyword transport
pub const ALLOWED_HEADERS: [http::header::HeaderName; 2] =
    [http::header::CONTENT_TYPE, http::header::AUTHORIZATION];

/// Allowed methods for the keyword transport
pub const ALLOWED_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::OPTIONS];

/// Default max age for preflight cache (1 hour)
pub const DEFAULT_MAX_AGE_SECS: u64 = 3600;

/// Creates the strict CORS layer that only allows localhost origins.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin, _| {
            is_localhost_origin(origin)
        }))
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(ALLOWED_HEADERS)
        .max_age(Duration::from_secs(DEFAULT_MAX_AGE_SECS))
}

/// Creates a permissive CORS layer for development/testing.
///
/// Not for production: allows every origin.
pub fn cors_layer_permissive() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
        .max_age(Duration::from_secs(DEFAULT_MAX_AGE_SECS))
}

/// Checks whether the given Origin header value is a localhost origin.
///
/// Accepts `http(s)://localhost`, `http(s)://127.0.0.1`, and
/// `http(s)://[::1]`, with or without a port. Everything else — external
/// domains, other private IPs, malformed origins — is rejected.
pub fn is_localhost_origin(origin: &HeaderValue) -> bool {
    let origin_str = match origin.to_str() {
        Ok(s) => s,
        Err(_) => return false,
    };

    let parsed = match Url::parse(origin_str) {
        Ok(u) => u,
        Err(_) => return false,
    };

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return false;
    }

    matches!(
        parsed.host_str(),
        Some("localhost") | Some("127.0.0.1") | Some("[::1]")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(s: &'static str) -> HeaderValue {
        HeaderValue::from_static(s)
    }

    #[test]
    fn test_localhost_origins_allowed() {
        assert!(is_localhost_origin(&origin("http://localhost")));
        assert!(is_localhost_origin(&origin("http://localhost:3000")));
        assert!(is_localhost_origin(&origin("https://localhost:8270")));
        assert!(is_localhost_origin(&origin("http://127.0.0.1:8270")));
        assert!(is_localhost_origin(&origin("http://[::1]:8270")));
    }

    #[test]
    fn test_external_origins_rejected() {
        assert!(!is_localhost_origin(&origin("http://example.com")));
        assert!(!is_localhost_origin(&origin("http://192.168.1.1:8270")));
        assert!(!is_localhost_origin(&origin("http://localhostevil.com")));
        assert!(!is_localhost_origin(&origin("https://localhost.example.com")));
    }

    #[test]
    fn test_non_http_schemes_rejected() {
        assert!(!is_localhost_origin(&origin("ftp://localhost")));
        assert!(!is_localhost_origin(&origin("file:///etc/passwd")));
    }

    #[test]
    fn test_malformed_origin_rejected() {
        assert!(!is_localhost_origin(&origin("not a url")));
        assert!(!is_localhost_origin(&origin("")));
    }
}
