//! Observability subsystem.
//!
//! Structured logging via `tracing`; every subsystem logs state
//! transitions, purges, retries, and rate-limit waits through it.

pub mod logging;

pub use logging::init_logging;
