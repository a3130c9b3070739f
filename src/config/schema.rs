//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Environment variable selecting the backend origin.
pub const BACKEND_URL_ENV: &str = "BACKEND_URL";

/// Environment variable selecting the listener bind address.
pub const LISTEN_ENV: &str = "LISTEN";

/// Root configuration for the forwarding gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Backend origin the gateway forwards to.
    pub backend: BackendConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Body buffering limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl GatewayConfig {
    /// Apply environment overrides on top of file/default values.
    ///
    /// `BACKEND_URL` selects the backend origin; `LISTEN` the bind address.
    pub fn apply_env(&mut self) {
        if let Ok(origin) = std::env::var(BACKEND_URL_ENV) {
            if !origin.is_empty() {
                self.backend.origin = origin;
            }
        }
        if let Ok(addr) = std::env::var(LISTEN_ENV) {
            if !addr.is_empty() {
                self.listener.bind_address = addr;
            }
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Backend origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend; the target path is appended verbatim.
    pub origin: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            origin:
                "http://consumer-administration-dev-alb-639243243.us-east-1.elb.amazonaws.com"
                    .to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for one outbound backend call, in milliseconds.
    pub forward_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { forward_ms: 30_000 }
    }
}

/// Body buffering limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum inbound request body size in bytes.
    pub max_request_body_bytes: usize,

    /// Maximum backend response body size in bytes.
    pub max_response_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_body_bytes: 2 * 1024 * 1024,
            max_response_body_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
