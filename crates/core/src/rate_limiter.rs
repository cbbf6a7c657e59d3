//! Process-wide pacing for outbound meal API calls.
//!
//! At most one call is admitted per interval, regardless of caller. The "time of last
//! permitted call" sits behind an async mutex that is held across the wait, so concurrent
//! callers queue on the lock and each one sees the timestamp written by its predecessor.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Suspends the caller until a call is permitted, then records the permit time.
    pub async fn acquire(&self) {
        let mut last_call = self.last_call.lock().await;

        if let Some(previous) = *last_call {
            let ready_at = previous + self.min_interval;
            if ready_at > Instant::now() {
                tracing::debug!(
                    wait_ms = (ready_at - Instant::now()).as_millis() as u64,
                    "rate limiter delaying outbound call"
                );
                sleep_until(ready_at).await;
            }
        }

        *last_call = Some(Instant::now());
    }
}
