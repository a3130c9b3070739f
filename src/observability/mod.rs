//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handling produces:
//!     → structured log events (tracing, initialized in main)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of one invocation
//! - Metrics are cheap (atomic increments) and off by default

pub mod metrics;
