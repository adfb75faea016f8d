//! Read-path retry helper.
//!
//! Storage errors on idempotent reads are retried transparently a bounded
//! number of times. Writes (inserts, deletes, counter updates) must never go
//! through this helper: a lost response does not prove a lost write, and a
//! blind retry can double-count.

use domain::errors::{DomainError, DomainResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Clone, Debug)]
pub struct ReadRetry {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for ReadRetry {
    fn default() -> Self {
        // one transparent retry
        Self {
            max_attempts: 2,
            delay: Duration::from_millis(50),
        }
    }
}

pub async fn retry_read<F, Fut, T>(policy: &ReadRetry, mut op: F) -> DomainResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match op().await {
            Ok(v) => return Ok(v),
            // only storage errors are retryable; not-found and validation are final
            Err(e @ DomainError::StorageError { .. }) => {
                if attempt >= policy.max_attempts {
                    return Err(e);
                }
                tracing::debug!(attempt, error = %e, "read retry");
                sleep(policy.delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
