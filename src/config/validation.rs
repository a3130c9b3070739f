//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones. Returns all validation
//! errors, not just the first; validation is a pure function over the config.

use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn err(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(err(
            "listener.bind_address",
            format!("not a valid socket address: {}", config.listener.bind_address),
        ));
    }

    match Url::parse(&config.backend.origin) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(err(
                    "backend.origin",
                    format!("scheme must be http or https, got {}", url.scheme()),
                ));
            }
            if url.host_str().is_none() {
                errors.push(err("backend.origin", "missing host"));
            }
        }
        Err(e) => {
            errors.push(err("backend.origin", format!("not an absolute URL: {}", e)));
        }
    }

    if config.timeouts.forward_ms == 0 {
        errors.push(err("timeouts.forward_ms", "must be greater than zero"));
    }

    if config.limits.max_request_body_bytes == 0 {
        errors.push(err("limits.max_request_body_bytes", "must be greater than zero"));
    }
    if config.limits.max_response_body_bytes == 0 {
        errors.push(err("limits.max_response_body_bytes", "must be greater than zero"));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(err(
            "observability.metrics_address",
            format!(
                "not a valid socket address: {}",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
