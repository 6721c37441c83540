//! Per-group rate limiter.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::rate_limit::{BucketConfig, EndpointGroup, RateLimitConfig, TokenBucket};

/// Bucket plus the admission queue for one group.
#[derive(Debug)]
struct GroupLimiter {
    /// Held by the waiter at the head of the queue. `tokio::sync::Mutex` is
    /// FIFO, so waiters are admitted in arrival order.
    queue: tokio::sync::Mutex<()>,
    /// Bucket state; only held for short, non-blocking sections.
    bucket: parking_lot::Mutex<TokenBucket>,
}

impl GroupLimiter {
    fn new(config: BucketConfig) -> Self {
        Self {
            queue: tokio::sync::Mutex::new(()),
            bucket: parking_lot::Mutex::new(TokenBucket::new(
                config.capacity,
                config.refill_per_sec,
            )),
        }
    }
}

/// Token-bucket rate limiter keyed by [`EndpointGroup`].
///
/// Each group has its own bucket and its own locks, so a backlog in one group
/// never delays another. Groups without a configured bucket share the most
/// conservative configured bucket (lowest refill rate).
///
/// # Example
///
/// ```rust
/// use upbit_api_client::rate_limit::{EndpointGroup, RateLimitConfig, RateLimiter};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let limiter = RateLimiter::new(&RateLimitConfig::default());
/// limiter.admit(EndpointGroup::Ticker).await;
/// assert!(limiter.available(EndpointGroup::Ticker) < 10.0);
/// # }
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    groups: HashMap<EndpointGroup, Arc<GroupLimiter>>,
    fallback: Arc<GroupLimiter>,
    enabled: bool,
}

impl RateLimiter {
    /// Create a limiter from configuration.
    pub fn new(config: &RateLimitConfig) -> Self {
        let groups: HashMap<EndpointGroup, Arc<GroupLimiter>> = config
            .buckets
            .iter()
            .map(|(group, bucket)| (*group, Arc::new(GroupLimiter::new(*bucket))))
            .collect();

        let fallback = config
            .most_conservative()
            .and_then(|group| groups.get(&group).cloned())
            .unwrap_or_else(|| Arc::new(GroupLimiter::new(BucketConfig::CONSERVATIVE)));

        Self {
            groups,
            fallback,
            enabled: config.enabled,
        }
    }

    fn limiter(&self, group: EndpointGroup) -> &GroupLimiter {
        self.groups.get(&group).unwrap_or(&self.fallback)
    }

    /// Wait until a token for `group` is available, then consume it.
    ///
    /// Never fails. Dropping the returned future before it completes leaves
    /// the bucket untouched.
    pub async fn admit(&self, group: EndpointGroup) {
        if !self.enabled {
            return;
        }

        let limiter = self.limiter(group);
        let _turn = limiter.queue.lock().await;

        loop {
            let result = limiter.bucket.lock().try_acquire();
            match result {
                Ok(()) => {
                    debug!(%group, "Rate limit token acquired");
                    return;
                }
                Err(wait) => {
                    debug!(%group, ?wait, "Waiting for rate limit token");
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    /// Take a token for `group` only if one is available right now.
    pub fn try_admit(&self, group: EndpointGroup) -> bool {
        if !self.enabled {
            return true;
        }
        let limiter = self.limiter(group);
        // Queued waiters go first.
        let Ok(_turn) = limiter.queue.try_lock() else {
            return false;
        };
        limiter.bucket.lock().try_acquire().is_ok()
    }

    /// Reconcile the local bucket with a server-reported remaining count.
    ///
    /// The local count is lowered to `remaining` if it is higher, and never raised.
    pub fn observe(&self, group: EndpointGroup, remaining: u32) {
        if !self.enabled {
            return;
        }
        let clamped = self.limiter(group).bucket.lock().clamp(remaining);
        if clamped {
            warn!(%group, remaining, "Server reports less quota than local bucket; clamping");
        }
    }

    /// Tokens currently available for `group`.
    pub fn available(&self, group: EndpointGroup) -> f64 {
        self.limiter(group).bucket.lock().available()
    }

    /// Whether rate limiting is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(&RateLimitConfig::default())
    }
}
