//! Retry decorator for the privacy manager client.
//!
//! Exponential backoff (base * 2^attempt, capped) for transient failures;
//! permanent failures surface immediately without burning attempts.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::ports::{ClientError, PrivacyManagerClient};

/// Backoff policy for transient privacy manager failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Delay before the first retry; doubles on every subsequent one.
    pub base_delay: Duration,
    /// Upper bound on a single backoff delay.
    pub max_delay: Duration,
    /// Total attempts, including the initial call.
    pub max_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            max_attempts: 5,
        }
    }
}

impl RetryConfig {
    /// Backoff delay after the given zero-based attempt.
    fn delay_after(&self, attempt: u32) -> Duration {
        let exp = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        exp.min(self.max_delay)
    }
}

/// Privacy manager client with transparent retry on transient failures.
pub struct RetryingPrivacyClient<C> {
    inner: C,
    config: RetryConfig,
}

impl<C> RetryingPrivacyClient<C> {
    /// Wraps a client with the given backoff policy.
    pub fn new(inner: C, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    async fn with_retry<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, ClientError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, ClientError>>,
    {
        let mut attempt = 0u32;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt + 1 < self.config.max_attempts => {
                    let delay = self.config.delay_after(attempt);
                    debug!(
                        operation,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        %err,
                        "Transient privacy manager failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    warn!(operation, attempt, %err, "Privacy manager call failed");
                    return Err(err);
                }
            }
        }
    }
}

#[async_trait]
impl<C: PrivacyManagerClient> PrivacyManagerClient for RetryingPrivacyClient<C> {
    async fn store_raw(
        &self,
        chain_id: u64,
        payload: &[u8],
        private_from: &str,
    ) -> Result<Vec<u8>, ClientError> {
        self.with_retry("store_raw", || {
            self.inner.store_raw(chain_id, payload, private_from)
        })
        .await
    }

    async fn get_status(&self, chain_id: u64) -> Result<String, ClientError> {
        self.with_retry("get_status", || self.inner.get_status(chain_id))
            .await
    }
}
