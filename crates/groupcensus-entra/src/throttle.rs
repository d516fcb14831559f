//! Backoff policy for throttled (HTTP 429) Graph responses.
//!
//! Only throttling is retried. Every other failure surfaces on the first
//! attempt so the caller can record it against the group it concerns.

use std::time::Duration;
use tracing::warn;

/// How long to wait between throttled attempts, and how many to allow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottlePolicy {
    /// Retries after the initial attempt (default: 3).
    pub max_retries: u32,
    /// Backoff base when no Retry-After header is sent (default: 1000ms).
    pub base_delay_ms: u64,
    /// Upper bound for any single wait (default: 60000ms).
    pub max_delay_ms: u64,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 60_000,
        }
    }
}

impl ThrottlePolicy {
    /// Default delays with a custom retry budget.
    #[must_use]
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Short delays for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 10,
            max_delay_ms: 50,
        }
    }

    /// Parses a Retry-After header given in seconds.
    ///
    /// HTTP-date values are not supported and fall back to backoff.
    #[must_use]
    pub fn parse_retry_after(header_value: &str) -> Option<u64> {
        header_value.trim().parse::<u64>().ok()
    }

    /// Wait before retry number `attempt` (zero-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32, retry_after_secs: Option<u64>) -> Duration {
        let max = Duration::from_millis(self.max_delay_ms);
        let delay = match retry_after_secs {
            Some(secs) => Duration::from_secs(secs),
            None => {
                let factor = 2u64.saturating_pow(attempt.min(16));
                Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
            }
        };
        if delay > max {
            warn!(
                requested_ms = delay.as_millis() as u64,
                max_ms = self.max_delay_ms,
                "Throttle delay capped"
            );
            max
        } else {
            delay
        }
    }

    /// True while another attempt is allowed.
    #[must_use]
    pub fn allows_retry(&self, retries_so_far: u32) -> bool {
        retries_so_far < self.max_retries
    }
}
