//! Upstream read-API services.
//!
//! # Data Flow
//! ```text
//! host UI / CLI
//!     → prices.rs   (SOL spot, token stats, trending)
//!     → metadata.rs (off-chain metadata documents)
//!         → fetch::FetchGate (cache, rate window, retries)
//!             → http.rs (GET + status classification)
//! ```
//!
//! Services are constructed at the composition root and passed to
//! consumers explicitly; there is no global instance.

pub mod http;
pub mod metadata;
pub mod prices;
pub mod types;

pub use metadata::MetadataService;
pub use prices::PriceService;
pub use types::{TokenMetadata, TokenStats, TrendingToken};
