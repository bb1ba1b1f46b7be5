//! Exponential backoff between retry attempts.

use std::time::Duration;

/// Delay before the retry that follows failed attempt `attempt`
/// (zero-based): `base * 2^attempt`, strictly capped at `max`.
pub fn backoff_delay(attempt: u32, base: Duration, max: Duration) -> Duration {
    let factor = 2u32.saturating_pow(attempt);
    base.saturating_mul(factor).min(max)
}
