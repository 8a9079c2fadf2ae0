use std::fmt::Display;
use std::future::Future;
use std::num::NonZeroU32;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// How many times to run an operation and how long to wait between tries.
///
/// The delay is fixed; there is no backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: NonZeroU32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: NonZeroU32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Build a policy from an unchecked attempt count.
    pub fn try_new(max_attempts: u32, delay: Duration) -> Result<Self> {
        let max_attempts = NonZeroU32::new(max_attempts).ok_or(Error::ZeroAttempts)?;
        Ok(Self::new(max_attempts, delay))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: NonZeroU32::new(3).unwrap_or(NonZeroU32::MIN),
            delay: Duration::from_millis(1000),
        }
    }
}

/// Run `op` until it succeeds or the policy's attempts are used up,
/// treating every failure as retryable. Returns the last error.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, op: F) -> std::result::Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: Display,
{
    retry_if(policy, op, |_| true).await
}

/// Like [`retry`], but an error for which `is_retryable` returns false is
/// returned straight away.
pub async fn retry_if<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    mut op: F,
    is_retryable: P,
) -> std::result::Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: Display,
    P: Fn(&E) -> bool,
{
    let max_attempts = policy.max_attempts.get();
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(attempt, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if attempt >= max_attempts => {
                warn!(attempt, max_attempts, error = %e, "Operation failed, no attempts left");
                return Err(e);
            }
            Err(e) if !is_retryable(&e) => {
                warn!(attempt, error = %e, "Operation failed with a non-retryable error");
                return Err(e);
            }
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = policy.delay.as_millis() as u64,
                    error = %e,
                    "Attempt failed, retrying"
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}
