//! # Preference Store Configuration Module
//!
//! Recovery settings for the preference fetch. The fetch is the only external
//! I/O in the ranking critical path and is treated as a soft dependency:
//! bounded timeout, a couple of retries with jittered backoff, then an empty
//! profile. Recommendations without personalization beat no recommendations.

// Constants for preference store recovery
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_BASE_RETRY_DELAY_MS: u64 = 200;
pub const DEFAULT_MAX_RETRY_DELAY_MS: u64 = 2_000;
pub const DEFAULT_LOAD_TIMEOUT_MS: u64 = 3_000;

/// Recovery configuration for preference loading
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Maximum number of retry attempts after the first failure
    pub max_retries: u32,
    /// Base delay between retries in milliseconds
    pub base_retry_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_retry_delay_ms: u64,
    /// Deadline for a single load attempt in milliseconds
    pub load_timeout_ms: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_retry_delay_ms: DEFAULT_BASE_RETRY_DELAY_MS,
            max_retry_delay_ms: DEFAULT_MAX_RETRY_DELAY_MS,
            load_timeout_ms: DEFAULT_LOAD_TIMEOUT_MS,
        }
    }
}

impl RecoveryConfig {
    /// Backoff delay for the given retry attempt (0-based), capped at the
    /// configured maximum, before jitter
    pub fn backoff_delay_ms(&self, attempt: u32) -> u64 {
        let exp = self
            .base_retry_delay_ms
            .saturating_mul(1_u64 << attempt.min(16));
        exp.min(self.max_retry_delay_ms)
    }
}
