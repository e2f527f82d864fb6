//! Retrying with exponential backoff.

use std::time::Duration;

use crate::{
    promise::{Promise, TaskError},
    timer,
};

/// Immutable configuration for [`retry`].
///
/// A policy is a number of quiet attempts with a doubling pause between them,
/// followed by one final attempt whose failure is allowed to propagate. With a
/// first delay of `d` and three retries, the pauses between attempts are `d`,
/// `2d`, and `4d`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    first_delay: Duration,
    retries: u32,
}

impl RetryPolicy {
    /// Creates a policy with `retries` quiet attempts and doubling pauses
    /// starting at `first_delay`.
    #[must_use]
    pub const fn exponential(first_delay: Duration, retries: u32) -> Self {
        RetryPolicy {
            first_delay,
            retries,
        }
    }

    /// Total number of attempts the policy performs, the final one included.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.retries + 1
    }
}

/// Runs `operation` until it succeeds or the policy is exhausted.
///
/// Each attempt starts a fresh promise by calling `operation`. Failures of the
/// first `retries` attempts are swallowed; between attempts the runner pauses
/// on [`timer::delay`], doubling the pause each round. The final attempt runs
/// without a safety net: its error is returned verbatim, original cause
/// intact, instead of a generic retries-exhausted wrapper that would mask the
/// ultimate failure reason.
///
/// Pausing between attempts is a natural fit for calls to remote services,
/// where immediate re-requests only pile onto whatever caused the failure.
///
/// # Errors
///
/// Whatever the final attempt fails with.
///
/// # Example
/// ```
/// use std::time::Duration;
///
/// use asyncell::{Promise, retry};
///
/// let policy = retry::RetryPolicy::exponential(Duration::from_millis(10), 3);
///
/// # async {
/// let value = retry::retry(policy, || Promise::resolved(7)).await.unwrap();
/// assert_eq!(value, 7);
/// # };
/// ```
pub async fn retry<T, F>(policy: RetryPolicy, mut operation: F) -> Result<T, TaskError>
where
    T: Clone + Send + 'static,
    F: FnMut() -> Promise<T>,
{
    let mut pause = policy.first_delay;
    for _ in 0..policy.retries {
        if let Ok(value) = operation().wait().await {
            return Ok(value);
        }
        timer::delay(pause).wait().await?;
        pause = pause.saturating_mul(2);
    }
    // Last try, letting the error propagate.
    operation().wait().await
}
