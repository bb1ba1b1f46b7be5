//! Rate-limited, cached upstream fetching.
//!
//! # Data Flow
//! ```text
//! service call
//!     → gate.rs (TTL cache lookup)
//!         miss → window.rs (sliding-window admission, computed waits)
//!             → the network operation
//!                 failure → backoff.rs (capped exponential delay) → retry
//!     → typed value, cached on success
//! ```
//!
//! # Design Decisions
//! - One gate per upstream resource; all its callers share one window
//! - Errors are classified once, where first observed (429 vs. the rest)
//! - An observed 429 clears the local window: the upstream's accounting
//!   is authoritative
//! - Same-key concurrent misses coalesce onto a single in-flight call

pub mod backoff;
pub mod gate;
pub mod types;
pub mod window;

pub use gate::FetchGate;
pub use types::{FetchError, FetchOptions, FetchResult};
pub use window::RequestWindow;
