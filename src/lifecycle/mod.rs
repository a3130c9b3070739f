//! Lifecycle management subsystem.
//!
//! Shutdown: signal received → stop accepting → drain in-flight → exit.
//! Invocations are independent, so draining is just waiting for the
//! connections axum already holds.

pub mod shutdown;

pub use shutdown::Shutdown;
