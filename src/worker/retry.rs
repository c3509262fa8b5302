use std::fmt::Display;
use std::time::Duration;
use tracing::{error, warn};

/// Retries an async operation with exponential backoff: after the n-th
/// failure the wrapper sleeps `base_delay * 2^n` before trying again, giving
/// up once `max_attempts` attempts have been made.
///
/// This is the only retry layer: the poller deletes a message after any
/// terminal outcome, so queue redelivery only covers process crashes.
pub async fn retry_with_backoff<F, Fut, T, E>(
    operation_name: &str,
    max_attempts: u32,
    base_delay: Duration,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempts = 0;
    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                attempts += 1;
                if attempts >= max_attempts {
                    error!(
                        "{} failed after {} attempts: {}",
                        operation_name, attempts, e
                    );
                    return Err(e);
                }

                let delay = base_delay * 2u32.pow(attempts);
                warn!(
                    "{} failed (attempt {}/{}): {}. Retrying in {:?}...",
                    operation_name, attempts, max_attempts, e, delay
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn returns_first_success_without_retrying() {
        let calls = Arc::new(AtomicU64::new(0));
        let counter = calls.clone();

        let result: Result<i32, String> =
            retry_with_backoff("test_op", 3, Duration::from_millis(1), || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(42)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_until_eventual_success() {
        let calls = Arc::new(AtomicU64::new(0));
        let counter = calls.clone();

        let result: Result<i32, String> =
            retry_with_backoff("test_op", 3, Duration::from_millis(1), || {
                let counter = counter.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    if n < 3 {
                        Err(format!("attempt {} failed", n))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU64::new(0));
        let counter = calls.clone();

        let result: Result<i32, String> =
            retry_with_backoff("test_op", 3, Duration::from_millis(1), || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err("still broken".to_string())
                }
            })
            .await;

        assert_eq!(result.unwrap_err(), "still broken");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
