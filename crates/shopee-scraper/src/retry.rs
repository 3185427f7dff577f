//! Bounded retry loop with per-attempt jitter and linear backoff.
//!
//! The loop is an explicit state machine driven through a [`Sleeper`], so
//! tests can observe every delay without waiting on the wall clock.
//!
//! | Step | Delay |
//! |------|-------|
//! | before every attempt | jitter, uniform in `[jitter_min, jitter_max)` |
//! | after failed attempt `i` (0-indexed), if another follows | `retry_delay * (i + 1)` |

use std::future::Future;
use std::time::Duration;

use futures::future::BoxFuture;
use rand::Rng;
use shopee_core::ScraperConfig;

use crate::error::ScraperError;

/// Async sleep capability injected into the retry loop.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// Production sleeper backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, never zero.
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub jitter_min: Duration,
    pub jitter_max: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_JITTER_MIN: Duration = Duration::from_millis(1_000);
    pub const DEFAULT_JITTER_MAX: Duration = Duration::from_millis(3_000);

    #[must_use]
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self {
            max_attempts: config.max_retries().max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms()),
            jitter_min: Self::DEFAULT_JITTER_MIN,
            jitter_max: Self::DEFAULT_JITTER_MAX,
        }
    }

    /// Replaces the jitter window. An empty window (`max <= min`) always
    /// yields `min`.
    #[must_use]
    pub fn with_jitter(mut self, min: Duration, max: Duration) -> Self {
        self.jitter_min = min;
        self.jitter_max = max;
        self
    }

    /// Wait after failed attempt `attempt` (0-indexed).
    #[must_use]
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        self.retry_delay.saturating_mul(attempt.saturating_add(1))
    }

    pub fn jitter<R: Rng>(&self, rng: &mut R) -> Duration {
        if self.jitter_max <= self.jitter_min {
            return self.jitter_min;
        }
        rng.random_range(self.jitter_min..self.jitter_max)
    }
}

enum RetryState<T> {
    Attempting(u32),
    Success(T),
    Exhausted(Option<ScraperError>),
}

/// Runs `operation` until it succeeds or `policy.max_attempts` are used.
///
/// Every failure is retried. On exhaustion the last error is returned, or
/// [`ScraperError::RetriesExhausted`] if no attempt ran.
pub(crate) async fn run_with_retries<T, J, F, Fut>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    mut next_jitter: J,
    mut operation: F,
) -> Result<T, ScraperError>
where
    J: FnMut() -> Duration,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let max_attempts = policy.max_attempts;
    let mut state = if max_attempts == 0 {
        RetryState::Exhausted(None)
    } else {
        RetryState::Attempting(0)
    };

    loop {
        state = match state {
            RetryState::Attempting(attempt) => {
                sleeper.sleep(next_jitter()).await;

                match operation(attempt).await {
                    Ok(value) => RetryState::Success(value),
                    Err(err) if attempt + 1 >= max_attempts => {
                        tracing::warn!(
                            attempt = attempt + 1,
                            max_attempts,
                            error = %err,
                            "final scrape attempt failed"
                        );
                        RetryState::Exhausted(Some(err))
                    }
                    Err(err) => {
                        let delay = policy.backoff_after(attempt);
                        tracing::warn!(
                            attempt = attempt + 1,
                            max_attempts,
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            error = %err,
                            "scrape attempt failed, retrying after backoff"
                        );
                        sleeper.sleep(delay).await;
                        RetryState::Attempting(attempt + 1)
                    }
                }
            }
            RetryState::Success(value) => return Ok(value),
            RetryState::Exhausted(last_err) => {
                return Err(last_err.unwrap_or(ScraperError::RetriesExhausted {
                    attempts: max_attempts,
                }))
            }
        };
    }
}
