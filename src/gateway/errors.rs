//! Error taxonomy and the Error Envelope.
//!
//! Classification inspects io error kinds first and falls back to substring
//! matching on the rendered error chain. The underlying identifiers are
//! host/runtime specific, so the result is best-effort diagnostics for the
//! operator, never load-bearing behavior: every classified failure produces
//! the same status-500 envelope.

use std::error::Error as StdError;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed error label carried by every envelope.
pub const ERROR_LABEL: &str = "Proxy request failed";

/// Classified failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Outbound call did not complete within the forward timeout.
    Timeout,
    /// Name resolution failed for the backend host.
    DnsError,
    /// Backend actively refused the connection.
    ConnectionRefused,
    /// Backend unreachable at the network layer.
    NetworkError,
    /// Anything else.
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::DnsError => "DNS_ERROR",
            ErrorCode::ConnectionRefused => "CONNECTION_REFUSED",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::Unknown => "UNKNOWN",
        }
    }
}

/// Failure of one forwarding attempt.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("backend call did not complete within {limit_ms} ms")]
    Timeout { limit_ms: u64 },

    #[error("target URL invalid: {0}")]
    BadTarget(#[from] axum::http::uri::InvalidUri),

    #[error("failed to build upstream request: {0}")]
    BuildRequest(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[source] hyper_util::client::legacy::Error),

    #[error("failed to read backend response body: {0}")]
    ResponseBody(#[source] axum::Error),
}

impl ForwardError {
    /// Map the failure onto the wire taxonomy.
    pub fn code(&self) -> ErrorCode {
        match self {
            ForwardError::Timeout { .. } => ErrorCode::Timeout,
            ForwardError::Upstream(e) => classify(e),
            ForwardError::ResponseBody(e) => classify(e),
            ForwardError::BadTarget(_) | ForwardError::BuildRequest(_) => ErrorCode::Unknown,
        }
    }

    /// Human-readable detail: the full source chain, outermost first.
    pub fn details(&self) -> String {
        render_chain(self)
    }
}

/// Classify an arbitrary failure by walking its source chain.
pub fn classify(error: &(dyn StdError + 'static)) -> ErrorCode {
    let mut rendered = String::new();
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            match io_err.kind() {
                io::ErrorKind::ConnectionRefused => return ErrorCode::ConnectionRefused,
                io::ErrorKind::TimedOut => return ErrorCode::NetworkError,
                io::ErrorKind::HostUnreachable | io::ErrorKind::NetworkUnreachable => {
                    return ErrorCode::NetworkError
                }
                _ => {}
            }
        }
        rendered.push_str(&e.to_string().to_ascii_lowercase());
        rendered.push(' ');
        current = e.source();
    }

    if rendered.contains("failed to lookup address")
        || rendered.contains("getaddrinfo")
        || rendered.contains("name resolution")
        || rendered.contains("dns error")
    {
        ErrorCode::DnsError
    } else if rendered.contains("connection refused") {
        ErrorCode::ConnectionRefused
    } else if rendered.contains("timed out") || rendered.contains("unreachable") {
        ErrorCode::NetworkError
    } else {
        ErrorCode::Unknown
    }
}

fn render_chain(error: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![error.to_string()];
    let mut current = error.source();
    while let Some(e) = current {
        parts.push(e.to_string());
        current = e.source();
    }
    parts.join(": ")
}

/// Fixed-shape error body returned on any gateway-side failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub code: ErrorCode,
    pub details: String,
    #[serde(rename = "backendUrl")]
    pub backend_url: String,
}

impl ErrorEnvelope {
    pub fn new(error: &ForwardError, backend_origin: &str) -> Self {
        Self {
            error: ERROR_LABEL.to_string(),
            code: error.code(),
            details: error.details(),
            backend_url: backend_origin.to_string(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::json!({
            "error": self.error,
            "code": self.code.as_str(),
            "details": self.details,
            "backendUrl": self.backend_url,
        })
        .to_string()
    }
}
