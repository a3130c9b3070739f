//! Request identity for log correlation.
//!
//! # Responsibilities
//! - Attach a request ID as early as possible so every log line about one
//!   invocation carries the same id
//! - Distinguish client-supplied ids from generated ones: only a
//!   client-supplied `x-request-id` is ever propagated to the backend
//!
//! # Design Decisions
//! - Generated ids are UUID v4
//! - The id lives in request extensions, not headers; the inbound header
//!   map stays exactly as the client sent it

use std::task::{Context, Poll};

use axum::http::{HeaderMap, Request};
use tower::{Layer, Service};
use uuid::Uuid;

/// Header name the client uses to supply its own id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Correlation id for one invocation.
#[derive(Debug, Clone)]
pub enum RequestId {
    /// Taken from the inbound `x-request-id` header.
    ClientSupplied(String),
    /// Generated because the client sent none; never forwarded.
    Generated(String),
}

impl RequestId {
    /// Read the id from inbound headers, generating one when absent.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match headers.get(X_REQUEST_ID).and_then(|v| v.to_str().ok()) {
            Some(value) if !value.is_empty() => Self::ClientSupplied(value.to_string()),
            _ => Self::Generated(Uuid::new_v4().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::ClientSupplied(id) | Self::Generated(id) => id,
        }
    }

    pub fn is_client_supplied(&self) -> bool {
        matches!(self, Self::ClientSupplied(_))
    }
}

/// Tower layer attaching a [`RequestId`] extension to every request.
#[derive(Debug, Clone, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Service wrapper produced by [`RequestIdLayer`].
#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for RequestIdService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        let id = RequestId::from_headers(request.headers());
        request.extensions_mut().insert(id);
        self.inner.call(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn client_supplied_id_is_kept() {
        let mut headers = HeaderMap::new();
        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc-123"));

        let id = RequestId::from_headers(&headers);
        assert!(id.is_client_supplied());
        assert_eq!(id.as_str(), "abc-123");
    }

    #[test]
    fn missing_header_generates_uuid() {
        let id = RequestId::from_headers(&HeaderMap::new());
        assert!(!id.is_client_supplied());
        assert_eq!(id.as_str().len(), 36);
    }

    #[test]
    fn empty_header_generates_uuid() {
        let mut headers = HeaderMap::new();
        headers.insert(X_REQUEST_ID, HeaderValue::from_static(""));

        let id = RequestId::from_headers(&headers);
        assert!(!id.is_client_supplied());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Request-ID", HeaderValue::from_static("abc"));

        let id = RequestId::from_headers(&headers);
        assert!(id.is_client_supplied());
        assert_eq!(id.as_str(), "abc");
    }
}
