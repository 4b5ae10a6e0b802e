//! Global request spacing for the rate-limited query API
//!
//! The API budget is expressed as requests per minute; the limiter converts
//! it to a minimum interval between the *start times* of consecutive
//! requests. Requests may still overlap in flight when responses are slow;
//! only starts are serialized. One instance is shared by every call site
//! that targets the limited API, passed explicitly rather than held as a
//! module-level singleton so tests can substitute a no-op limiter.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug)]
pub struct RateLimiter {
    spacing: Duration,
    next_start: Mutex<Instant>,
}

impl RateLimiter {
    /// Limiter derived from a requests-per-minute budget (75/min -> 800ms).
    pub fn from_budget(requests_per_minute: u64) -> Self {
        Self::with_spacing(Duration::from_millis(60_000 / requests_per_minute.max(1)))
    }

    /// Limiter with an explicit minimum spacing between request starts.
    pub fn with_spacing(spacing: Duration) -> Self {
        Self {
            spacing,
            next_start: Mutex::new(Instant::now()),
        }
    }

    /// No-op limiter for tests and unthrottled endpoints.
    pub fn unlimited() -> Self {
        Self::with_spacing(Duration::ZERO)
    }

    pub fn spacing(&self) -> Duration {
        self.spacing
    }

    /// Waits until this caller may start its request.
    ///
    /// Callers are admitted in lock-acquisition order; each admission pushes
    /// the next admissible start time forward by the configured spacing. The
    /// lock is only held to claim a slot, never across the wait itself, so a
    /// slow sleeper does not block other callers from queueing up.
    pub async fn acquire(&self) {
        let start_at = {
            let mut next = self.next_start.lock().await;
            let now = Instant::now();
            let start_at = (*next).max(now);
            *next = start_at + self.spacing;
            start_at
        };
        tokio::time::sleep_until(start_at).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_consecutive_acquires_are_spaced() {
        let limiter = RateLimiter::with_spacing(Duration::from_millis(800));
        let begin = Instant::now();

        limiter.acquire().await;
        let first = Instant::now() - begin;
        limiter.acquire().await;
        let second = Instant::now() - begin;
        limiter.acquire().await;
        let third = Instant::now() - begin;

        assert!(first < Duration::from_millis(800), "first start is immediate");
        assert!(second >= Duration::from_millis(800));
        assert!(third >= Duration::from_millis(1600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_time_does_not_accumulate_credit() {
        let limiter = RateLimiter::with_spacing(Duration::from_millis(800));
        limiter.acquire().await;

        // A long idle gap must not allow a burst afterwards
        tokio::time::sleep(Duration::from_secs(10)).await;
        let begin = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        let elapsed = Instant::now() - begin;

        assert!(elapsed >= Duration::from_millis(800));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_acquires_serialize_starts() {
        use std::sync::Arc;

        let limiter = Arc::new(RateLimiter::with_spacing(Duration::from_millis(100)));
        let begin = Instant::now();

        let tasks: Vec<_> = (0..5)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move {
                    limiter.acquire().await;
                    Instant::now() - begin
                })
            })
            .collect();

        let mut starts = Vec::new();
        for task in tasks {
            starts.push(task.await.unwrap());
        }
        starts.sort();

        for pair in starts.windows(2) {
            assert!(
                pair[1] - pair[0] >= Duration::from_millis(100),
                "starts {:?} and {:?} are closer than the spacing",
                pair[0],
                pair[1]
            );
        }
    }

    #[tokio::test]
    async fn test_unlimited_does_not_wait() {
        let limiter = RateLimiter::unlimited();
        assert_eq!(limiter.spacing(), Duration::ZERO);
        limiter.acquire().await;
        limiter.acquire().await;
    }

    #[test]
    fn test_budget_conversion() {
        assert_eq!(
            RateLimiter::from_budget(75).spacing(),
            Duration::from_millis(800)
        );
        assert_eq!(
            RateLimiter::from_budget(60).spacing(),
            Duration::from_millis(1000)
        );
        // Zero budget must not divide by zero
        assert_eq!(
            RateLimiter::from_budget(0).spacing(),
            Duration::from_millis(60_000)
        );
    }
}
