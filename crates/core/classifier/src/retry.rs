use std::future::Future;
use std::time::Duration;

use crate::TransportError;

/// How often and how patiently a remote call is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Fixed wait between two attempts
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 5,
            backoff: Duration::from_secs(1),
        }
    }
}

/// Run an operation until it succeeds, fails with a fatal error,
/// or runs out of attempts
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, TransportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < policy.max_attempts => {
                warn!(
                    "Attempt {attempt}/{} failed: {err}, retrying in {:?}",
                    policy.max_attempts, policy.backoff
                );

                tokio::time::sleep(policy.backoff).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use crate::{with_retry, RetryPolicy, TransportError};

    const NO_WAIT: RetryPolicy = RetryPolicy {
        max_attempts: 5,
        backoff: Duration::ZERO,
    };

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let attempts = AtomicU32::new(0);

        let result = with_retry(&NO_WAIT, || async {
            if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(TransportError::RateLimited)
            } else {
                Ok("done")
            }
        })
        .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stops_at_the_attempt_bound() {
        let attempts = AtomicU32::new(0);

        let result: Result<(), _> = with_retry(&NO_WAIT, || async {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(TransportError::Api { status: 503 })
        })
        .await;

        assert_eq!(result, Err(TransportError::Api { status: 503 }));
        assert_eq!(attempts.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn fatal_errors_are_not_retried() {
        let attempts = AtomicU32::new(0);

        let result: Result<(), _> = with_retry(&NO_WAIT, || async {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(TransportError::Connection)
        })
        .await;

        assert_eq!(result, Err(TransportError::Connection));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
