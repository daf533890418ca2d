use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Enforces a minimum spacing between outbound geocoder requests.
///
/// The lock is held across the sleep, so waiting callers queue behind each
/// other and every dispatch is at least `min_interval` after the previous one.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_dispatch: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_dispatch: Mutex::new(None),
        }
    }

    /// Suspend until a request may be dispatched, then record the dispatch.
    pub async fn wait_for_slot(&self) {
        let mut last_dispatch = self.last_dispatch.lock().await;

        if let Some(last) = *last_dispatch {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!(wait_ms = wait.as_millis() as u64, "Rate limiting geocoder request");
                sleep(wait).await;
            }
        }

        *last_dispatch = Some(Instant::now());
    }
}
