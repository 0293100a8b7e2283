//! Retry classification, backoff and idempotency keys.

use std::time::Duration;

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::ApiError;

/// Exponential backoff settings for retriable requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub base_delay_ms: u64,
    /// Upper bound on the exponential part of the delay.
    pub max_delay_ms: u64,
    /// Uniform random jitter added on top, `0..=jitter_ms`.
    pub jitter_ms: u64,
}

impl RetryPolicy {
    /// Policy that never retries.
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: 0,
            max_delay_ms: 0,
            jitter_ms: 0,
        }
    }

    /// Delay before retry number `retry` (zero-based), without jitter.
    pub fn backoff_ms(&self, retry: u32) -> u64 {
        let factor = 1_u64.checked_shl(retry).unwrap_or(u64::MAX);
        self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms)
    }

    /// Delay before retry number `retry`, including random jitter.
    pub fn delay(&self, retry: u32) -> Duration {
        let jitter = if self.jitter_ms == 0 {
            0
        } else {
            rand::rng().random_range(0..=self.jitter_ms)
        };
        Duration::from_millis(self.backoff_ms(retry).saturating_add(jitter))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 500,
            max_delay_ms: 8_000,
            jitter_ms: 250,
        }
    }
}

/// Whether repeating a failed request can succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Transient; retry with backoff.
    Retriable,
    /// Repeating the request gives the same result.
    Permanent,
}

/// Classifies an API failure for retry decisions.
pub fn classify_api_error(error: &ApiError) -> FailureClass {
    match error {
        ApiError::Transport(_) | ApiError::Timeout | ApiError::RateLimited | ApiError::Server(_) => {
            FailureClass::Retriable
        }
        ApiError::Unauthorized(_)
        | ApiError::Client(_)
        | ApiError::Decode(_)
        | ApiError::InvalidResponse(_)
        | ApiError::InvalidEndpoint(_)
        | ApiError::InvalidRequest(_) => FailureClass::Permanent,
    }
}

/// Hex SHA-256 of the payload; stable across retries of the same upload.
pub fn idempotency_key_for_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

/// Waits between retries.
pub trait Sleeper: Send + Sync {
    /// Blocks for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for backoff math.

    use super::*;

    #[test]
    fn backoff_doubles_until_capped() {
        let policy = RetryPolicy {
            max_retries: 5,
            base_delay_ms: 100,
            max_delay_ms: 1_000,
            jitter_ms: 0,
        };
        let delays: Vec<u64> = (0..5).map(|retry| policy.backoff_ms(retry)).collect();
        assert_eq!(delays, vec![100, 200, 400, 800, 1_000]);
        assert_eq!(policy.backoff_ms(80), 1_000);
    }

    #[test]
    fn jitter_stays_within_bound() {
        let policy = RetryPolicy {
            max_retries: 1,
            base_delay_ms: 10,
            max_delay_ms: 10,
            jitter_ms: 5,
        };
        for _ in 0..50 {
            let delay = policy.delay(0).as_millis();
            assert!((10..=15).contains(&delay));
        }
    }

    #[test]
    fn idempotency_key_is_hex_sha256() {
        assert_eq!(
            idempotency_key_for_payload(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
