//! Token bucket state for one endpoint group.

use std::time::Duration;

use tokio::time::Instant;

// Absorbs float drift so a bucket refilled to 0.999... still admits.
const EPSILON: f64 = 1e-9;
const MIN_WAIT: Duration = Duration::from_micros(1);

/// A token bucket with a fixed capacity and refill rate.
///
/// Starts full. Tokens are kept in `[0, capacity]` at all times.
#[derive(Debug)]
pub struct TokenBucket {
    tokens: f64,
    capacity: f64,
    refill_per_sec: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a full bucket.
    ///
    /// A zero capacity is raised to one and a non-positive refill rate is
    /// raised to a tiny positive value so that every waiter is eventually admitted.
    pub fn new(capacity: u32, refill_per_sec: f64) -> Self {
        let capacity = f64::from(capacity.max(1));
        let refill_per_sec = if refill_per_sec.is_finite() && refill_per_sec > 0.0 {
            refill_per_sec
        } else {
            1e-6
        };
        Self {
            tokens: capacity,
            capacity,
            refill_per_sec,
            last_refill: Instant::now(),
        }
    }

    /// Add the tokens accrued since the last refill.
    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        self.last_refill = now;
    }

    /// Try to take one token.
    ///
    /// Returns `Err(wait)` with the time until a token will be available.
    pub fn try_acquire(&mut self) -> Result<(), Duration> {
        self.refill();
        if self.tokens + EPSILON >= 1.0 {
            self.tokens = (self.tokens - 1.0).max(0.0);
            Ok(())
        } else {
            let deficit = 1.0 - self.tokens;
            let wait = Duration::from_secs_f64(deficit / self.refill_per_sec);
            Err(wait.max(MIN_WAIT))
        }
    }

    /// Lower the token count to at most `remaining`. Never raises it.
    pub fn clamp(&mut self, remaining: u32) -> bool {
        self.refill();
        let remaining = f64::from(remaining);
        if remaining < self.tokens {
            self.tokens = remaining;
            true
        } else {
            false
        }
    }

    /// Tokens currently available, including accrued refill.
    pub fn available(&mut self) -> f64 {
        self.refill();
        self.tokens
    }

    /// Maximum number of tokens.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Tokens added per second.
    pub fn refill_per_sec(&self) -> f64 {
        self.refill_per_sec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_bucket_allows_burst_up_to_capacity() {
        let mut bucket = TokenBucket::new(3, 1.0);

        assert!(bucket.try_acquire().is_ok());
        assert!(bucket.try_acquire().is_ok());
        assert!(bucket.try_acquire().is_ok());

        let wait = bucket.try_acquire().unwrap_err();
        assert!(wait <= Duration::from_secs(1));
        assert!(wait > Duration::from_millis(900));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bucket_refills_over_time() {
        let mut bucket = TokenBucket::new(2, 10.0);
        bucket.try_acquire().unwrap();
        bucket.try_acquire().unwrap();
        assert!(bucket.try_acquire().is_err());

        tokio::time::advance(Duration::from_millis(100)).await;
        assert!(bucket.try_acquire().is_ok());
        assert!(bucket.try_acquire().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_bucket_never_exceeds_capacity() {
        let mut bucket = TokenBucket::new(5, 100.0);
        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(bucket.available(), 5.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clamp_only_lowers() {
        let mut bucket = TokenBucket::new(10, 1.0);
        assert!(bucket.clamp(4));
        assert_eq!(bucket.available(), 4.0);

        assert!(!bucket.clamp(8));
        assert_eq!(bucket.available(), 4.0);

        assert!(bucket.clamp(0));
        assert_eq!(bucket.available(), 0.0);
    }

    #[test]
    fn test_degenerate_config_is_sanitized() {
        let bucket = TokenBucket::new(0, 0.0);
        assert_eq!(bucket.capacity(), 1.0);
        assert!(bucket.refill_per_sec() > 0.0);
    }
}
