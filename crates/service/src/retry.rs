//! Full-jitter exponential backoff: the only place a retryable
//! [`LedgerError`] is ever retried. Repositories never retry themselves.

use std::future::Future;
use std::time::Duration;

use ledgr_shared::config::RetryConfig;
use ledgr_shared::LedgerError;
use rand::Rng;

/// Runs `operation` up to `config.max_attempts` times, retrying only when the
/// error is [`LedgerError::retryable`]. Delay before the k-th retry is drawn
/// uniformly from `[0, min(backoff_cap_ms, backoff_base_ms * 2^k)]`.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, mut operation: F) -> Result<T, LedgerError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LedgerError>>,
{
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.retryable() && attempt < config.max_attempts => {
                let delay = backoff_delay_ms(config, attempt);
                tracing::warn!(attempt, delay_ms = delay, error = %err, "retrying after conflict");
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            Err(err) => return Err(err),
        }
    }
}

fn backoff_delay_ms(config: &RetryConfig, k: u32) -> u64 {
    let exp = config.backoff_base_ms.saturating_mul(1u64 << k.min(32));
    let cap = exp.min(config.backoff_cap_ms);
    rand::rng().random_range(0..=cap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn backoff_delay_never_exceeds_the_cap() {
        let config = RetryConfig {
            max_attempts: 5,
            backoff_base_ms: 50,
            backoff_cap_ms: 1000,
        };
        for k in 0..10 {
            let delay = backoff_delay_ms(&config, k);
            assert!(delay <= config.backoff_cap_ms);
        }
    }

    #[tokio::test]
    async fn with_retry_stops_as_soon_as_the_operation_succeeds() {
        let config = RetryConfig {
            max_attempts: 5,
            backoff_base_ms: 1,
            backoff_cap_ms: 2,
        };
        let calls = AtomicU32::new(0);
        let result = with_retry(&config, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, LedgerError>(42)
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn with_retry_gives_up_after_max_attempts_on_a_retryable_error() {
        let config = RetryConfig {
            max_attempts: 3,
            backoff_base_ms: 1,
            backoff_cap_ms: 2,
        };
        let calls = AtomicU32::new(0);
        let result: Result<(), LedgerError> = with_retry(&config, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(LedgerError::optimistic_lock_conflict("stale version"))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn with_retry_never_retries_a_non_retryable_error() {
        let config = RetryConfig {
            max_attempts: 5,
            backoff_base_ms: 1,
            backoff_cap_ms: 2,
        };
        let calls = AtomicU32::new(0);
        let result: Result<(), LedgerError> = with_retry(&config, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(LedgerError::validation("bad request"))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
