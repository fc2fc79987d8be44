//! Bounded retry with a fixed inter-attempt delay.

use std::future::Future;

use crate::config::RetryPolicy;
use crate::error::Result;

/// Run `operation` up to `policy.max_attempts` times.
///
/// Only errors classified as retryable consume retry budget; anything
/// else (4xx responses, local validation) propagates immediately. The
/// delay between attempts is constant, with no exponential backoff.
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_attempts && err.is_retryable() => {
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
