use rand::Rng;
use reqwest::StatusCode;
use std::time::Duration;

use crate::config::RetrySettings;

/// Exponential backoff for server-side failures.
///
/// Only responses with a status of 500 or above are retried; client errors
/// and transport failures are returned as they are.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            initial_delay: Duration::from_millis(settings.initial_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
            jitter: settings.jitter,
        }
    }
}

impl RetryPolicy {
    /// `attempt` is 1-based and counts the request that just finished
    pub fn should_retry(&self, status: StatusCode, attempt: u32) -> bool {
        status.as_u16() >= 500 && attempt < self.max_attempts
    }

    /// Delay before the attempt following `attempt`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base = self.base_delay(attempt);
        if self.jitter {
            let ms = base.as_millis() as u64;
            Duration::from_millis(rand::thread_rng().gen_range(0..=ms))
        } else {
            base
        }
    }

    fn base_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let delay = self.initial_delay.saturating_mul(1u32 << exponent);
        delay.min(self.max_delay)
    }
}
