//! Retry policy for idempotent node reads.
//!
//! Only `NodeUnreachable` is retried. A rejection means the node processed the
//! call and said no, so asking again would return the same answer.

use std::future::Future;
use tokio::time::sleep;

use crate::blockchain::types::{SubmitError, SubmitResult};
use crate::config::RetryConfig;
use crate::resilience::backoff::retry_delay;

/// Whether a failed read may be attempted again.
pub fn is_retryable(error: &SubmitError) -> bool {
    matches!(error, SubmitError::NodeUnreachable(_))
}

/// Run `read` up to `config.read_attempts` times.
pub async fn retry_read<T, F, Fut>(config: &RetryConfig, operation: &'static str, read: F) -> SubmitResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = SubmitResult<T>>,
{
    let attempts = config.read_attempts.max(1);
    let mut retry = 0;
    loop {
        match read().await {
            Ok(value) => return Ok(value),
            Err(e) if is_retryable(&e) && retry + 1 < attempts => {
                retry += 1;
                let delay = retry_delay(retry, config);
                tracing::warn!(
                    operation,
                    retry,
                    attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Node read failed, retrying"
                );
                sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn config(read_attempts: u32) -> RetryConfig {
        RetryConfig {
            read_attempts,
            base_delay_ms: 10,
            max_delay_ms: 100,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_unreachable_until_success() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = retry_read(&config(3), "nonce", move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(SubmitError::NodeUnreachable("refused".into()))
            } else {
                Ok(7u64)
            }
        })
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_attempts() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: SubmitResult<u64> = retry_read(&config(2), "balance", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(SubmitError::NodeUnreachable("refused".into()))
        })
        .await;

        assert!(matches!(result, Err(SubmitError::NodeUnreachable(_))));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_rejection_is_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: SubmitResult<u64> = retry_read(&config(5), "estimate", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(SubmitError::NodeRejected("execution reverted".into()))
        })
        .await;

        assert_eq!(result, Err(SubmitError::NodeRejected("execution reverted".into())));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_single_attempt_means_no_retry() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let _: SubmitResult<u64> = retry_read(&config(1), "nonce", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(SubmitError::NodeUnreachable("refused".into()))
        })
        .await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
