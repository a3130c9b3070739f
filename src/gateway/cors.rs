//! Permissive cross-origin response headers.
//!
//! The gateway exists so a browser UI can reach a backend it cannot call
//! directly; every response must therefore be readable cross-origin.

use axum::http::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN,
};

/// Wildcard origin.
pub const ALLOW_ORIGIN: &str = "*";

/// Headers a browser may send through the gateway.
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization, X-Request-ID";

/// Methods the gateway accepts.
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

/// Apply the full permissive set (success, preflight and error-500 paths).
pub fn apply_full(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(ALLOW_ORIGIN));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
}

/// Apply only the origin header (client-input rejection paths).
pub fn apply_origin_only(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(ALLOW_ORIGIN));
}
