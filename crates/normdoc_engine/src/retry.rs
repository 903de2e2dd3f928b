use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::FetchError;

/// Errors that can distinguish transient failures worth another attempt
/// from permanent ones.
pub trait TransientError {
    fn is_transient(&self) -> bool;
}

impl TransientError for FetchError {
    fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}

/// Bounded fixed-interval retry parameters for one pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl RetryPolicy {
    /// Listing pages recover quickly; fewer attempts, longer interval.
    pub fn for_pages() -> Self {
        Self {
            max_attempts: 20,
            interval: Duration::from_secs(30),
        }
    }

    /// Attachment fetches fail more often; more attempts, shorter interval.
    pub fn for_cards() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(20),
        }
    }
}

/// Runs `op` until it succeeds, fails permanently, or exhausts the policy.
///
/// Only transient errors are retried; the sleep between attempts is the
/// policy's fixed interval.
pub async fn with_retry<T, E, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, E>
where
    E: TransientError + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < attempts => {
                harvest_logging::harvest_warn!(
                    "{label}: attempt {attempt}/{attempts} failed ({err}), retrying in {:?}",
                    policy.interval
                );
                tokio::time::sleep(policy.interval).await;
            }
            Err(err) => return Err(err),
        }
    }
}
