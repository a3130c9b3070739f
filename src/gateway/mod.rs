//! The forwarding core.
//!
//! # Data Flow
//! ```text
//! Inbound request (any method, any path)
//!     → forward.rs (preflight / method gate / target construction)
//!     → header filter (x-request-id, authorization through; rest dropped)
//!     → upstream call raced against the forward timeout
//!     → payload.rs (JSON-or-text normalization)
//!     → cors.rs (permissive header set on every response)
//!
//! On failure:
//!     errors.rs (classification → Error Envelope, status 500)
//! ```
//!
//! # Design Decisions
//! - One invocation = at most one outbound call; no retry, no caching
//! - The timeout cancels the upstream call by dropping its future
//! - Classification is best-effort diagnostics, never load-bearing

pub mod cors;
pub mod errors;
pub mod forward;
pub mod payload;

pub use errors::{ErrorCode, ErrorEnvelope};
