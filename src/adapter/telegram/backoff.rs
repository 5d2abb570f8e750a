//! Exponential backoff with jitter for reaching the Bot API.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::ReconnectionConfig;

/// Retry delay schedule driven by [`ReconnectionConfig`].
#[derive(Debug, Clone)]
pub struct Backoff {
    config: ReconnectionConfig,
    /// Delay the next attempt starts from.
    current_delay_ms: u64,
    /// Failures so far.
    attempts: u32,
}

impl Backoff {
    #[must_use]
    pub fn new(config: ReconnectionConfig) -> Self {
        let initial_delay = config.initial_delay_ms;
        Self {
            config,
            current_delay_ms: initial_delay,
            attempts: 0,
        }
    }

    /// Delay before the next attempt. Grows the base for the one after.
    pub fn next_delay(&mut self) -> Duration {
        let base_delay = Duration::from_millis(self.current_delay_ms);
        let delay = base_delay + Duration::from_millis(self.jitter_ms(base_delay));

        let next_delay = (self.current_delay_ms as f64 * self.config.backoff_multiplier) as u64;
        self.current_delay_ms = next_delay.min(self.config.max_delay_ms);
        self.attempts = self.attempts.saturating_add(1);

        delay
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Up to a fifth of the base delay.
    fn jitter_ms(&self, base_delay: Duration) -> u64 {
        let jitter_range_ms = u64::try_from(base_delay.as_millis()).unwrap_or(u64::MAX) / 5;
        if jitter_range_ms == 0 {
            return 0;
        }

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        u64::from(nanos) % (jitter_range_ms + 1)
    }
}
