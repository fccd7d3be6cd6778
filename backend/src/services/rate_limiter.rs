use std::sync::Arc;
use tokio::sync::{AcquireError, Semaphore};
use tokio::time::{sleep, Duration, Instant};
use parking_lot::Mutex;

/// Bounds outbound calls to one provider.
///
/// Two limits apply: at most `max_concurrent` calls are in flight, and
/// consecutive calls start at least `60s / requests_per_minute` apart.
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
    /// Start time reserved by the most recent caller
    next_slot: Mutex<Instant>,
    min_delay: Duration,
}

impl RateLimiter {
    /// `requests_per_minute == 0` disables spacing and leaves only the
    /// concurrency bound. `max_concurrent` is raised to at least 1.
    pub fn new(max_concurrent: usize, requests_per_minute: u32) -> Self {
        let min_delay = if requests_per_minute == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(60_000 / requests_per_minute as u64)
        };

        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            next_slot: Mutex::new(Instant::now()),
            min_delay,
        }
    }

    /// Wait for a concurrency permit and this caller's start slot.
    ///
    /// The permit is released when the returned guard is dropped.
    pub async fn acquire(&self) -> Result<RateLimitGuard, AcquireError> {
        let permit = self.semaphore.clone().acquire_owned().await?;

        // Reserve a slot under the lock, sleep outside it
        let start_at = {
            let mut next = self.next_slot.lock();
            let now = Instant::now();
            let start_at = if *next > now { *next } else { now };
            *next = start_at + self.min_delay;
            start_at
        };

        let now = Instant::now();
        if start_at > now {
            sleep(start_at - now).await;
        }

        Ok(RateLimitGuard { _permit: permit })
    }

    #[cfg(test)]
    fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// Holds a concurrency permit for the duration of one provider call.
pub struct RateLimitGuard {
    _permit: tokio::sync::OwnedSemaphorePermit,
}
