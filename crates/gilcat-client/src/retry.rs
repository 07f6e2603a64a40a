//! Exponential-backoff retry around fallible async operations.

use std::{future::Future, time::Duration};

use crate::error::Result;

/// At most `max_attempts` tries with exponential backoff in between.
///
/// Only errors classified as transient by
/// [`Error::is_retryable`](crate::Error::is_retryable) are replayed;
/// terminal errors — and the final attempt's error — propagate unmodified.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
  /// Maximum attempts including the first. At least 1.
  pub max_attempts: u32,
  /// Base backoff unit; the sleep after attempt n is
  /// `base_delay × 2^(n−1)`.
  pub base_delay:   Duration,
}

impl RetryPolicy {
  pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
    Self { max_attempts: max_attempts.max(1), base_delay }
  }

  /// The backoff slept after a failed attempt (1-based).
  pub fn delay_for(&self, attempt: u32) -> Duration {
    self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
  }

  /// Run `op`, building a fresh future per attempt, until it succeeds, a
  /// terminal error is returned, or attempts run out.
  pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
  where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
  {
    let mut attempt = 1u32;
    loop {
      match op().await {
        Ok(value) => return Ok(value),
        Err(e) if attempt < self.max_attempts && e.is_retryable() => {
          let delay = self.delay_for(attempt);
          tracing::warn!(
            attempt,
            max_attempts = self.max_attempts,
            ?delay,
            error = %e,
            "transient failure, retrying"
          );
          tokio::time::sleep(delay).await;
          attempt += 1;
        }
        Err(e) => return Err(e),
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
  };

  use super::*;
  use crate::error::Error;

  fn policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(max_attempts, Duration::from_millis(1))
  }

  fn transient() -> Error {
    Error::Http { status: 503, message: "unavailable".into() }
  }

  fn terminal() -> Error {
    Error::Http { status: 404, message: "missing".into() }
  }

  #[tokio::test]
  async fn always_failing_op_runs_exactly_max_attempts() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();

    let result: Result<()> = policy(3)
      .run(|| {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Err(transient()) }
      })
      .await;

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    // The final attempt's error comes back unmodified.
    assert!(matches!(result, Err(Error::Http { status: 503, .. })));
  }

  #[tokio::test]
  async fn stops_at_first_success() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();

    let result = policy(5)
      .run(|| {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        async move { if n < 2 { Err(transient()) } else { Ok(n) } }
      })
      .await;

    assert_eq!(result.unwrap(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn terminal_error_is_never_retried() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();

    let result: Result<()> = policy(5)
      .run(|| {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Err(terminal()) }
      })
      .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(matches!(result, Err(Error::Http { status: 404, .. })));
  }

  #[test]
  fn backoff_doubles_per_attempt() {
    let policy = RetryPolicy::new(4, Duration::from_millis(100));
    assert_eq!(policy.delay_for(1), Duration::from_millis(100));
    assert_eq!(policy.delay_for(2), Duration::from_millis(200));
    assert_eq!(policy.delay_for(3), Duration::from_millis(400));
  }

  #[test]
  fn zero_attempts_is_clamped_to_one() {
    assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
  }
}
