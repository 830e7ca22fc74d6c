//! Retry configuration and backoff calculation.
//!
//! Sync building blocks only. The async retry loop that sleeps between
//! attempts lives with the HTTP client in `tutor-llm`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 2;
/// Default base delay in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 250;
/// Default maximum delay in milliseconds.
pub const DEFAULT_MAX_DELAY_MS: u64 = 60_000;

/// Configuration for retry logic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryConfig {
    /// Retries after the first attempt (default: 2, so 3 attempts total).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry in ms (default: 250). Doubles per retry.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Upper bound on a single delay in ms (default: 60000).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}
fn default_base_delay_ms() -> u64 {
    DEFAULT_BASE_DELAY_MS
}
fn default_max_delay_ms() -> u64 {
    DEFAULT_MAX_DELAY_MS
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
        }
    }
}

impl RetryConfig {
    /// Total attempts allowed, counting the first one.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay to wait after the given 1-based failed attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        Duration::from_millis(backoff_delay(
            attempt.saturating_sub(1),
            self.base_delay_ms,
            self.max_delay_ms,
        ))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Backoff calculation
// ─────────────────────────────────────────────────────────────────────────────

/// Exponential backoff delay without jitter.
///
/// Formula: `min(max_delay, base_delay * 2^retry)`
///
/// # Arguments
///
/// * `retry`: zero-based retry index (0 for the first retry)
/// * `base_delay_ms`: base delay in milliseconds
/// * `max_delay_ms`: maximum delay cap
pub fn backoff_delay(retry: u32, base_delay_ms: u64, max_delay_ms: u64) -> u64 {
    2u64.saturating_pow(retry)
        .saturating_mul(base_delay_ms)
        .min(max_delay_ms)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
