//! Retry policy with linear backoff.

use std::time::Duration;

use futures::future::BoxFuture;

use crate::config::Configuration;
use crate::request::RequestMethod;

/// Status codes that signal a transient failure.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Check if an HTTP status code is retryable.
pub fn is_retryable_status(status: u16) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}

/// Retry policy that determines when and how long to wait before retrying
/// one logical request.
///
/// The wait before retry `n` (1-based) is `retry_delay * n`, saturating.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    retry_delay: Duration,
    retry_non_idempotent: bool,
    attempt: u32,
}

impl RetryPolicy {
    /// Create a new retry policy.
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
            retry_non_idempotent: true,
            attempt: 0,
        }
    }

    /// Create a retry policy from the client configuration.
    pub fn from_config(config: &Configuration) -> Self {
        Self::new(config.max_retries(), config.retry_delay())
            .with_retry_non_idempotent(config.retry_non_idempotent())
    }

    /// Allow or forbid retrying POST requests.
    pub fn with_retry_non_idempotent(mut self, enabled: bool) -> Self {
        self.retry_non_idempotent = enabled;
        self
    }

    /// Number of retries performed so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Returns true if the retry budget is not exhausted.
    pub fn should_retry(&self) -> bool {
        self.attempt < self.max_retries
    }

    /// Returns true if a failure is eligible for another attempt.
    ///
    /// Failures without a status (no response) and statuses in
    /// [`RETRYABLE_STATUSES`] are retryable; everything else is terminal.
    pub fn is_retryable(&self, method: RequestMethod, status: Option<u16>) -> bool {
        if !self.retry_non_idempotent && !method.is_idempotent() {
            return false;
        }
        status.is_none_or(is_retryable_status)
    }

    /// Wait before retry `retry` (1-based). Saturates at `Duration::MAX`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.retry_delay.saturating_mul(retry)
    }

    /// Record a retry and return the delay before it.
    /// Returns None if the budget is exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if !self.should_retry() {
            return None;
        }

        self.attempt += 1;
        Some(self.delay_for(self.attempt))
    }
}

/// Suspends the current task between attempts.
pub trait Sleeper: Send + Sync + std::fmt::Debug {
    /// Wait for `delay`.
    fn sleep(&self, delay: Duration) -> BoxFuture<'static, ()>;
}

/// Sleeper backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, delay: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(delay))
    }
}
