//! Retry of transient EC2 failures.
//!
//! Delays double per attempt from a base that depends on the failure.
//! Throttling faults (`RequestLimitExceeded`, `Throttling`) start from
//! `throttle_delay`; connection drops and 5xx faults from `base_delay`.

use crate::error::Ec2Error;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry configuration.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// First delay after a transient network or server failure.
    pub base_delay: Duration,
    /// First delay after a throttling fault.
    pub throttle_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Draw each delay uniformly from `[delay / 2, delay]`.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
            throttle_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(20),
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Default delays with `max_retries` retries.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// A configuration that never retries.
    pub fn no_retry() -> Self {
        Self::new(0)
    }

    /// Set the base delay for network and server failures.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Set the base delay for throttling faults.
    pub fn with_throttle_delay(mut self, delay: Duration) -> Self {
        self.throttle_delay = delay;
        self
    }

    /// Set the delay cap.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Enable or disable jitter.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay before retry number `retry` (0 for the first retry) of a call
    /// that failed with `error`.
    pub fn delay_for(&self, retry: u32, error: &Ec2Error) -> Duration {
        let base = if error.is_throttling() {
            self.throttle_delay
        } else {
            self.base_delay
        };
        let delay = base
            .checked_mul(2u32.saturating_pow(retry))
            .unwrap_or(self.max_delay)
            .min(self.max_delay);

        if self.jitter && !delay.is_zero() {
            delay.mul_f64(rand::thread_rng().gen_range(0.5..=1.0))
        } else {
            delay
        }
    }
}

/// Runs an attempt closure until it succeeds, fails permanently, or runs
/// out of retries.
///
/// The closure is called afresh for every attempt, so a request signed
/// inside it gets a new timestamp each time.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a policy.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Run `attempt`, retrying errors for which [`Ec2Error::is_retryable`]
    /// holds.
    pub async fn execute<F, Fut, T>(&self, attempt: F) -> Result<T, Ec2Error>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, Ec2Error>>,
    {
        let mut retry = 0;
        loop {
            let error = match attempt().await {
                Ok(value) => {
                    if retry > 0 {
                        debug!(retries = retry, "EC2 call succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) => error,
            };

            if !error.is_retryable() {
                return Err(error);
            }
            if retry >= self.config.max_retries {
                warn!(retries = retry, error = %error, "EC2 call failed, retries exhausted");
                return Err(error);
            }

            let delay = self.config.delay_for(retry, &error);
            if error.is_throttling() {
                warn!(code = ?error.error_code(), delay_ms = delay.as_millis() as u64, "EC2 throttled the call");
            } else {
                debug!(error = %error, delay_ms = delay.as_millis() as u64, "Retrying EC2 call");
            }
            tokio::time::sleep(delay).await;
            retry += 1;
        }
    }
}
