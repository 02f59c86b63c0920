use std::time::Duration;

use crate::config::DispatchConfig;

/// High-level classification of an outcome for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Server asked us to slow down (HTTP 429).
    Throttled,
    /// Network-level failure (connection reset, DNS, etc.).
    Connection,
    /// Anything else (never retried).
    Other,
}

impl ErrorKind {
    /// True for the kinds the dispatcher requeues.
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Timeout | Self::Throttled | Self::Connection)
    }
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry; deliver the outcome as it is.
    NoRetry,
    /// Requeue at the tail after the given delay.
    RetryAfter(Duration),
}

/// Fixed-backoff retry policy: the delay does not grow with the attempt number.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Pause before the request re-enters the queue.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&DispatchConfig::default())
    }
}

impl From<&DispatchConfig> for RetryPolicy {
    fn from(cfg: &DispatchConfig) -> Self {
        Self {
            max_retries: cfg.max_retries,
            backoff: cfg.retry_delay(),
        }
    }
}

impl RetryPolicy {
    /// `retry_count` is the number of retries already performed (0 after the
    /// first attempt).
    pub fn decide(&self, retry_count: u32, kind: ErrorKind) -> RetryDecision {
        if retry_count >= self.max_retries || !kind.is_transient() {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.backoff)
    }
}
