//! Backoff for transient transport failures.
//!
//! These retries repeat the same HTTP request and are invisible to the
//! coercion loop, which only ever sees the final result of an exchange.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::TransportResult;

/// Configuration for retrying a request.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Wait strategy.
    pub wait: WaitStrategy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            wait: WaitStrategy::ExponentialJitter {
                initial: Duration::from_millis(500),
                max: Duration::from_secs(30),
                multiplier: 2.0,
                jitter: 0.1,
            },
        }
    }
}

impl RetryConfig {
    /// Create a new default config (no retries).
    pub fn new() -> Self {
        Self::default()
    }

    /// Config that never retries.
    pub fn no_retry() -> Self {
        Self::new()
    }

    /// Set max retries.
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Set the wait strategy.
    pub fn wait(mut self, strategy: WaitStrategy) -> Self {
        self.wait = strategy;
        self
    }

    /// Use a fixed delay.
    pub fn fixed(mut self, delay: Duration) -> Self {
        self.wait = WaitStrategy::Fixed(delay);
        self
    }
}

/// Strategy for waiting between retries.
#[derive(Debug, Clone)]
pub enum WaitStrategy {
    /// No waiting.
    None,
    /// Fixed delay.
    Fixed(Duration),
    /// Exponential backoff with jitter.
    ExponentialJitter {
        /// Initial delay.
        initial: Duration,
        /// Maximum delay.
        max: Duration,
        /// Multiplier for each attempt.
        multiplier: f64,
        /// Jitter factor (0.0 to 1.0).
        jitter: f64,
    },
}

impl WaitStrategy {
    /// Wait before retry number `attempt` (1-based).
    ///
    /// A server-provided Retry-After takes precedence, capped at the
    /// strategy's maximum.
    pub fn calculate(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        match self {
            WaitStrategy::None => Duration::ZERO,
            WaitStrategy::Fixed(d) => retry_after.unwrap_or(*d),
            WaitStrategy::ExponentialJitter {
                initial,
                max,
                multiplier,
                jitter,
            } => {
                if let Some(hint) = retry_after {
                    return hint.min(*max);
                }
                let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
                let base = initial.as_secs_f64() * multiplier.powi(exponent);
                let delay = (base + base * jitter * random_jitter()).min(max.as_secs_f64());
                Duration::from_secs_f64(delay.max(0.0))
            }
        }
    }
}

/// Execute an operation, retrying transient failures.
pub async fn with_retry<F, Fut, T>(config: &RetryConfig, operation: F) -> TransportResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = TransportResult<T>>,
{
    let max_attempts = config.max_retries.saturating_add(1);
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(error) => {
                if attempt >= max_attempts || !error.is_retryable() {
                    if attempt > 1 {
                        warn!(
                            attempt,
                            error = %error,
                            "Transport retries exhausted or error not retryable"
                        );
                    }
                    return Err(error);
                }

                let wait = config.wait.calculate(attempt, error.retry_after());
                debug!(
                    attempt,
                    max_attempts,
                    wait_ms = wait.as_millis() as u64,
                    error = %error,
                    "Waiting before transport retry"
                );
                sleep(wait).await;
            }
        }
    }
}

/// Random jitter factor between -1.0 and 1.0.
fn random_jitter() -> f64 {
    use rand::Rng;
    rand::thread_rng().gen_range(-1.0..1.0)
}
