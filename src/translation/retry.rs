//! Bounded retries with exponential backoff for completion requests.

use std::future::Future;
use std::time::Duration;

use crate::error::CompletionError;

const INITIAL_DELAY: Duration = Duration::from_millis(500);
const MAX_DELAY: Duration = Duration::from_secs(8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_delay: INITIAL_DELAY,
            max_delay: MAX_DELAY,
        }
    }

    /// Delay before retry number `retry` (zero-based).
    ///
    /// Doubles from `initial_delay` and never exceeds `max_delay`. A
    /// server-provided `Retry-After` wins but is capped the same way.
    pub fn delay_for(&self, retry: u32, retry_after: Option<Duration>) -> Duration {
        let backoff = self
            .initial_delay
            .saturating_mul(2u32.saturating_pow(retry));
        retry_after.unwrap_or(backoff).min(self.max_delay)
    }
}

/// Runs `operation` until it succeeds, fails terminally, or runs out of
/// retries.
///
/// `operation` receives the zero-based attempt number. Only transient errors
/// are retried; once retries are exhausted the last error is wrapped in
/// [`CompletionError::RetriesExhausted`].
pub async fn with_retries<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, CompletionError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, CompletionError>>,
{
    let mut attempt = 0;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_transient() => return Err(e),
            Err(e) if attempt >= policy.max_retries => {
                if policy.max_retries == 0 {
                    return Err(e);
                }
                return Err(CompletionError::RetriesExhausted {
                    attempts: attempt + 1,
                    last: Box::new(e),
                });
            }
            Err(e) => {
                let delay = policy.delay_for(attempt, e.retry_after());
                tracing::info!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "transient completion failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
