//! Bounded retry with exponential backoff for transient fetch failures.
//!
//! Server errors (5xx) and transport failures (timeouts, connection resets,
//! DNS) are retried; client errors (4xx) are terminal and returned on the
//! first attempt.

use std::time::Duration;

use crate::FetchError;

/// How many times to try a request and how long to back off in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Zero is treated as one.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles for each following retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `retry` (1-based): 1x, 2x, 4x, ...
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32 << retry.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(factor)
    }
}

/// Runs `attempt` until it succeeds, fails terminally, or the policy's
/// attempts are exhausted. Returns the last error in the latter cases.
///
/// # Errors
///
/// Returns the [`FetchError`] of the final attempt.
pub async fn with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    url: &str,
    mut attempt: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, FetchError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut tried = 1;

    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && tried < max_attempts => {
                let delay = policy.delay_for(tried);
                log::warn!(
                    "{url}: {e} (retry {tried}/{} in {delay:?})",
                    max_attempts - 1
                );
                tokio::time::sleep(delay).await;
                tried += 1;
            }
            Err(e) => {
                if e.is_retryable() {
                    log::warn!("{url}: giving up after {tried} attempts: {e}");
                }
                return Err(e);
            }
        }
    }
}
