//! Bounded retry with multiplicative backoff for store operations

use std::thread;
use std::time::Duration;

use crate::error::EngineError;
use crate::store::StoreError;

/// Retry schedule for transient store failures
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first (default: 3)
    pub max_attempts: u32,
    /// Delay before the first retry (default: 100 ms)
    pub initial_backoff: Duration,
    /// Backoff multiplier applied after each failed attempt (default: 2.0)
    pub multiplier: f32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(100),
            multiplier: 2.0,
        }
    }
}

/// Run a store operation under a retry policy
///
/// Retries transient failures up to `policy.max_attempts` total attempts,
/// sleeping `initial_backoff * multiplier^n` between them, then surfaces the
/// last failure as `EngineError::StoreUnavailable` for this operation only.
pub fn with_backoff<T, F>(policy: &RetryPolicy, mut op: F) -> Result<T, EngineError>
where
    F: FnMut() -> Result<T, StoreError>,
{
    let attempts = policy.max_attempts.max(1);
    let mut backoff = policy.initial_backoff;

    for attempt in 1..=attempts {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts => {
                log::warn!(
                    "Store operation failed (attempt {}/{}): {}; retrying in {:?}",
                    attempt,
                    attempts,
                    err,
                    backoff
                );
                thread::sleep(backoff);
                backoff = backoff.mul_f32(policy.multiplier);
            }
            Err(err) => {
                return Err(EngineError::StoreUnavailable(format!(
                    "{} (after {} attempts)",
                    err, attempts
                )));
            }
        }
    }

    unreachable!("retry loop returns on every path")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(1),
            multiplier: 1.0,
        }
    }

    #[test]
    fn test_succeeds_first_try() {
        let calls = AtomicU32::new(0);
        let result = with_backoff(&quick_policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, StoreError>(7)
        });
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_recovers_within_budget() {
        let calls = AtomicU32::new(0);
        let result = with_backoff(&quick_policy(), || {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(StoreError::Unavailable("flaky".to_string()))
            } else {
                Ok(42)
            }
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_exhausts_and_surfaces_store_unavailable() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_backoff(&quick_policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Timeout("down".to_string()))
        });
        assert!(matches!(result, Err(EngineError::StoreUnavailable(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
