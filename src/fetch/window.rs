//! Sliding-window request admission.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

/// Ordered timestamps of recently admitted requests for one upstream
/// resource.
///
/// Admission prunes timestamps older than the window, then admits only if
/// the remaining count is below the limit; otherwise it reports exactly
/// how long until the oldest timestamp ages out. Shared by all callers
/// hitting the same resource.
#[derive(Default)]
pub struct RequestWindow {
    stamps: Mutex<VecDeque<Instant>>,
}

impl RequestWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to admit a request now. On success the timestamp is recorded.
    /// On refusal returns the wait until the window next has room.
    ///
    /// A zero limit is treated as one; admission must always eventually
    /// succeed.
    pub fn try_admit(&self, max_requests: u32, window: Duration) -> Result<(), Duration> {
        let max_requests = max_requests.max(1);
        let mut stamps = self.stamps.lock().expect("request window mutex poisoned");
        let now = Instant::now();

        while let Some(oldest) = stamps.front() {
            if now.duration_since(*oldest) >= window {
                stamps.pop_front();
            } else {
                break;
            }
        }

        if stamps.len() < max_requests as usize {
            stamps.push_back(now);
            return Ok(());
        }

        // Safe: the branch above handles the empty case.
        let oldest = *stamps.front().expect("window full but empty");
        Err(window - now.duration_since(oldest))
    }

    /// Forget all recorded timestamps.
    ///
    /// Called after an externally observed rate limit: the upstream's
    /// accounting evidently disagrees with ours, so ours is stale.
    pub fn reset(&self) {
        self.stamps
            .lock()
            .expect("request window mutex poisoned")
            .clear();
    }

    /// Suspend until admitted, recomputing the wait each round so
    /// concurrent callers converge once the window clears.
    pub async fn admit(&self, max_requests: u32, window: Duration) {
        loop {
            match self.try_admit(max_requests, window) {
                Ok(()) => return,
                Err(wait) => {
                    tracing::debug!(wait_ms = wait.as_millis() as u64, "Rate window full, waiting");
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(1000);

    #[tokio::test]
    async fn test_admits_up_to_limit() {
        let window = RequestWindow::new();
        for _ in 0..3 {
            assert!(window.try_admit(3, WINDOW).is_ok());
        }
        assert!(window.try_admit(3, WINDOW).is_err());
    }

    #[tokio::test]
    async fn test_refusal_reports_time_until_room() {
        let window = RequestWindow::new();
        window.try_admit(1, WINDOW).unwrap();

        let wait = window.try_admit(1, WINDOW).unwrap_err();
        assert!(wait <= WINDOW);
        assert!(wait > Duration::from_millis(900));
    }

    #[tokio::test(start_paused = true)]
    async fn test_old_stamps_age_out() {
        let window = RequestWindow::new();
        window.try_admit(1, WINDOW).unwrap();
        assert!(window.try_admit(1, WINDOW).is_err());

        tokio::time::advance(Duration::from_millis(1001)).await;
        assert!(window.try_admit(1, WINDOW).is_ok());
    }

    #[tokio::test]
    async fn test_reset_clears_accounting() {
        let window = RequestWindow::new();
        for _ in 0..3 {
            window.try_admit(3, WINDOW).unwrap();
        }
        assert!(window.try_admit(3, WINDOW).is_err());

        window.reset();
        assert!(window.try_admit(3, WINDOW).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_admit_suspends_until_room() {
        let window = RequestWindow::new();
        window.try_admit(1, WINDOW).unwrap();

        let started = Instant::now();
        window.admit(1, WINDOW).await;
        assert!(started.elapsed() >= Duration::from_millis(999));
    }
}
