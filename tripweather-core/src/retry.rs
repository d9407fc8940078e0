//! Retry policy with exponential backoff for outbound forecast requests.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How many times to retry and how long to wait in between.
///
/// The wait after the `n`-th failed attempt (1-based) is
/// `backoff_factor * 2^(n-1)` seconds, capped at `max_backoff_secs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt (default: 5)
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Base backoff in seconds (default: 0.2)
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,

    /// Upper bound for a single wait in seconds (default: 120)
    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: f64,
}

const fn default_retries() -> u32 {
    5
}

const fn default_backoff_factor() -> f64 {
    0.2
}

const fn default_max_backoff() -> f64 {
    120.0
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retries: default_retries(),
            backoff_factor: default_backoff_factor(),
            max_backoff_secs: default_max_backoff(),
        }
    }
}

impl RetryConfig {
    /// No retries at all.
    pub const fn none() -> Self {
        Self { retries: 0, backoff_factor: 0.0, max_backoff_secs: 0.0 }
    }

    /// Retry `retries` times without sleeping.
    pub const fn immediate(retries: u32) -> Self {
        Self { retries, backoff_factor: 0.0, max_backoff_secs: 0.0 }
    }

    /// Total attempts including the first one.
    pub const fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Delay to wait after failed attempt `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.backoff_factor * 2f64.powi(exponent);
        let capped = secs.min(self.max_backoff_secs);

        if capped.is_finite() && capped > 0.0 {
            Duration::from_secs_f64(capped)
        } else {
            Duration::ZERO
        }
    }
}
