//! Retry policy: attempt budget and exponential backoff with jitter.

use std::time::Duration;

use rand::Rng;

/// Retry configuration for the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts per call, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Delay before the first retry; doubled for each further retry.
    pub backoff_base: Duration,
    /// Upper bound for a single delay.
    pub backoff_cap: Duration,
}

impl RetryConfig {
    /// No retries at all.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Attempts allowed, never less than one.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Backoff ceiling before jitter for the retry following attempt `attempt` (1-based).
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.backoff_base
            .saturating_mul(1u32 << exponent)
            .min(self.backoff_cap)
    }

    /// Jittered delay for the retry following attempt `attempt` (1-based).
    ///
    /// Uniform in `[d/2, d]` where `d` is [`base_delay`](Self::base_delay),
    /// and never shorter than `retry_after` when the server supplied one.
    pub fn delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let ceiling = self.base_delay(attempt);
        let floor = ceiling / 2;
        let jittered = if ceiling > floor {
            rand::thread_rng().gen_range(floor..=ceiling)
        } else {
            ceiling
        };
        match retry_after {
            Some(server) => jittered.max(server),
            None => jittered,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: Duration::from_millis(200),
            backoff_cap: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_delay_doubles_until_cap() {
        let config = RetryConfig {
            max_attempts: 10,
            backoff_base: Duration::from_millis(100),
            backoff_cap: Duration::from_millis(700),
        };
        assert_eq!(config.base_delay(1), Duration::from_millis(100));
        assert_eq!(config.base_delay(2), Duration::from_millis(200));
        assert_eq!(config.base_delay(3), Duration::from_millis(400));
        assert_eq!(config.base_delay(4), Duration::from_millis(700));
        assert_eq!(config.base_delay(40), Duration::from_millis(700));
    }

    #[test]
    fn test_jitter_stays_in_bounds() {
        let config = RetryConfig::default();
        for attempt in 1..=5 {
            let ceiling = config.base_delay(attempt);
            for _ in 0..100 {
                let delay = config.delay(attempt, None);
                assert!(delay >= ceiling / 2 && delay <= ceiling);
            }
        }
    }

    #[test]
    fn test_jitter_spreads_delays() {
        let config = RetryConfig {
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
            backoff_cap: Duration::from_secs(10),
        };
        let delays: std::collections::HashSet<Duration> =
            (0..50).map(|_| config.delay(1, None)).collect();
        assert!(delays.len() > 1);
    }

    #[test]
    fn test_retry_after_is_a_floor() {
        let config = RetryConfig::default();
        let delay = config.delay(1, Some(Duration::from_secs(3)));
        assert_eq!(delay, Duration::from_secs(3));
    }

    #[test]
    fn test_attempts_never_zero() {
        let config = RetryConfig {
            max_attempts: 0,
            ..RetryConfig::default()
        };
        assert_eq!(config.attempts(), 1);
        assert_eq!(RetryConfig::no_retry().attempts(), 1);
    }
}
