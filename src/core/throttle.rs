//! Per-caller submission throttle: a fixed-window counter with expiry
//! timestamps, keyed by the submitter's identity.
//!
//! In-process only. Running multiple instances against one store needs an
//! external keyed counter instead.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

struct Window {
    count: u32,
    expires_at: Instant,
}

pub struct SubmissionThrottle {
    max_per_window: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl SubmissionThrottle {
    /// A limit of zero disables throttling entirely.
    pub fn new(max_per_window: u32, window: Duration) -> Self {
        Self {
            max_per_window,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Counts one submission for the caller and reports whether it is
    /// within the window's limit.
    pub async fn admit(&self, caller: &str) -> bool {
        if self.max_per_window == 0 {
            return true;
        }

        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        // Expired entries restart their window lazily on the next hit.
        let window = windows
            .entry(caller.to_string())
            .and_modify(|w| {
                if w.expires_at < now {
                    w.count = 0;
                    w.expires_at = now + self.window;
                }
            })
            .or_insert_with(|| Window {
                count: 0,
                expires_at: now + self.window,
            });

        window.count += 1;
        if window.count > self.max_per_window {
            debug!(caller, "Submission throttled");
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_admits_up_to_the_limit() {
        let throttle = SubmissionThrottle::new(2, Duration::from_secs(60));

        assert!(throttle.admit("9876543210").await);
        assert!(throttle.admit("9876543210").await);
        assert!(!throttle.admit("9876543210").await);
    }

    #[tokio::test]
    async fn test_callers_are_counted_independently() {
        let throttle = SubmissionThrottle::new(1, Duration::from_secs(60));

        assert!(throttle.admit("9876543210").await);
        assert!(throttle.admit("9123456780").await);
        assert!(!throttle.admit("9876543210").await);
    }

    #[tokio::test]
    async fn test_window_expiry_resets_the_count() {
        let throttle = SubmissionThrottle::new(1, Duration::from_millis(10));

        assert!(throttle.admit("9876543210").await);
        assert!(!throttle.admit("9876543210").await);

        sleep(Duration::from_millis(20)).await;
        assert!(throttle.admit("9876543210").await);
    }

    #[tokio::test]
    async fn test_zero_limit_disables_throttling() {
        let throttle = SubmissionThrottle::new(0, Duration::from_millis(1));

        for _ in 0..100 {
            assert!(throttle.admit("9876543210").await);
        }
    }
}
