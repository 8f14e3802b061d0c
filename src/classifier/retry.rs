use super::ClassifyError;
use crate::constants::CLASSIFY_MAX_ATTEMPTS;
use log::{error, warn};
use rand::Rng;
use std::thread;
use std::time::Duration;

/// Exponential backoff with jitter for classification attempts.
///
/// The delay before retry `n` (0-based) is `base_delay * 2^n` plus a uniform
/// jitter in `[0, max_jitter)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: CLASSIFY_MAX_ATTEMPTS,
            base_delay: Duration::from_secs(1),
            max_jitter: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// A policy with `max_attempts` and no waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_jitter: Duration::ZERO,
        }
    }

    /// Delay before the retry that follows failed attempt `retry` (0-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let backoff = self.base_delay.saturating_mul(2u32.saturating_pow(retry.min(16)));
        let jitter = if self.max_jitter.is_zero() {
            Duration::ZERO
        } else {
            self.max_jitter.mul_f64(rand::rng().random_range(0.0..1.0))
        };
        backoff.saturating_add(jitter)
    }

    /// Runs `attempt` until it succeeds, fails permanently or attempts run out.
    pub(super) fn run<T>(
        &self,
        label: &str,
        mut attempt: impl FnMut() -> Result<T, ClassifyError>,
    ) -> Result<T, ClassifyError> {
        let max_attempts = self.max_attempts.max(1);
        let mut tries = 0;
        loop {
            tries += 1;
            match attempt() {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => {
                    error!("Failed to classify '{}' (not retryable): {}", label, e);
                    return Err(e);
                }
                Err(e) if tries >= max_attempts => {
                    error!(
                        "Failed to classify '{}' after {} attempts: {}",
                        label, max_attempts, e
                    );
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.delay_for(tries - 1);
                    warn!(
                        "Error classifying '{}': {}. Retrying in {:.2}s...",
                        label,
                        e,
                        delay.as_secs_f64()
                    );
                    thread::sleep(delay);
                }
            }
        }
    }
}
