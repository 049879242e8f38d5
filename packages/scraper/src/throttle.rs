//! Fixed-interval request gate shared by every fetch.
//!
//! Each caller of [`Throttle::wait`] is granted the next free slot; slots are
//! at least `interval` apart, regardless of how many workers are fetching.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum delay between the starts of consecutive requests.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Throttle {
    /// Creates a throttle with the given minimum spacing. A zero interval
    /// never waits.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::const_new(None),
        }
    }

    /// The configured spacing.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until this caller's slot comes up.
    pub async fn wait(&self) {
        if self.interval.is_zero() {
            return;
        }

        let mut next_slot = self.next_slot.lock().await;
        let now = Instant::now();
        let slot = match *next_slot {
            Some(at) if at > now => {
                tokio::time::sleep_until(at).await;
                at
            }
            _ => now,
        };
        *next_slot = Some(slot + self.interval);
    }
}
