//! Fetch error taxonomy and per-resource options.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from rate-limited upstream fetches.
///
/// The variant is decided once, where the underlying failure is first
/// observed; downstream code branches on the variant, never on message
/// text.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The upstream signalled a rate limit (HTTP 429).
    #[error("rate limited by upstream")]
    RateLimited,

    /// Upstream returned a non-success status other than 429.
    #[error("upstream returned status {0}")]
    Status(u16),

    /// Connection-level failure (DNS, TLS, timeout, reset).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body did not match the expected shape.
    #[error("response decode error: {0}")]
    Decode(String),

    /// All attempts failed; wraps the last underlying cause.
    #[error("fetch failed after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        /// True when the terminal cause was a rate-limit signal.
        rate_limited: bool,
        #[source]
        source: Box<FetchError>,
    },
}

impl FetchError {
    /// Whether this error is a rate-limit signal (directly or as the
    /// terminal cause of an exhausted retry loop).
    pub fn is_rate_limit(&self) -> bool {
        match self {
            FetchError::RateLimited => true,
            FetchError::Exhausted { rate_limited, .. } => *rate_limited,
            _ => false,
        }
    }
}

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Per-resource fetch behavior: cache freshness, retry policy, and the
/// request-rate window. Each call site configures its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchOptions {
    /// How long a cached value stays fresh, in milliseconds.
    pub ttl_ms: u64,

    /// Maximum operation attempts, the first try included.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Cap on the exponential backoff delay in milliseconds.
    pub max_delay_ms: u64,

    /// Fixed delay after an observed upstream rate limit, in milliseconds.
    pub rate_limit_delay_ms: u64,

    /// Sliding window length in milliseconds.
    pub window_ms: u64,

    /// Maximum requests admitted per window.
    pub max_requests_per_window: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            ttl_ms: 60_000,
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
            rate_limit_delay_ms: 10_000,
            window_ms: 60_000,
            max_requests_per_window: 10,
        }
    }
}

impl FetchOptions {
    pub fn ttl(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.ttl_ms)
    }

    pub fn base_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.base_delay_ms)
    }

    pub fn max_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.max_delay_ms)
    }

    pub fn rate_limit_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.rate_limit_delay_ms)
    }

    pub fn window(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.window_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            FetchError::Status(503).to_string(),
            "upstream returned status 503"
        );
        let err = FetchError::Exhausted {
            attempts: 3,
            rate_limited: true,
            source: Box::new(FetchError::RateLimited),
        };
        assert!(err.to_string().contains("3 attempts"));
        assert!(err.is_rate_limit());
    }

    #[test]
    fn test_rate_limit_classification() {
        assert!(FetchError::RateLimited.is_rate_limit());
        assert!(!FetchError::Status(500).is_rate_limit());
        assert!(!FetchError::Transport("reset".to_string()).is_rate_limit());
    }

    #[test]
    fn test_options_defaults() {
        let opts = FetchOptions::default();
        assert_eq!(opts.max_attempts, 3);
        assert_eq!(opts.ttl(), std::time::Duration::from_secs(60));
        assert_eq!(opts.max_requests_per_window, 10);
    }
}
