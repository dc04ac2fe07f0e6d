use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Fixed-interval request limiter.
///
/// Successive [`Throttle::ready`] calls return at least `interval` apart; the
/// first call returns immediately. Owned by the client of the rate-limited
/// provider so the spacing applies to that provider's requests only.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    /// Wait until the next request may be sent, then mark it as sent
    pub async fn ready(&self) {
        let mut last = self.last.lock().await;
        if let Some(prev) = *last {
            let next = prev + self.interval;
            if next > Instant::now() {
                tracing::debug!(
                    "Throttling for {}",
                    humantime::format_duration(next - Instant::now())
                );
                tokio::time::sleep_until(next).await;
            }
        }
        *last = Some(Instant::now());
    }
}
