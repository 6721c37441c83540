//! Rate limiting for Upbit API.
//!
//! Upbit budgets requests per endpoint group and answers with HTTP 429 once a
//! budget is exceeded (and with 418, an IP block, if the caller keeps going).
//! This module keeps a local token bucket per group so requests wait instead
//! of being rejected.
//!
//! ## Rate Limit Groups
//!
//! - **Quotation groups** (`market`, `candles`, `crix-trades`, `ticker`,
//!   `orderbook`): limited by IP address
//! - **Exchange `default` group**: limited by access key
//! - **Exchange `order` group**: order placement, limited by access key
//!
//! Responses carry a `Remaining-Req` header with the server's view of the
//! remaining quota; [`RateLimiter::observe`] lowers the local bucket to match.
//!
//! ## Example
//!
//! ```rust
//! use upbit_api_client::rate_limit::{BucketConfig, EndpointGroup, RateLimitConfig, RateLimiter};
//!
//! let config = RateLimitConfig::default()
//!     .with_bucket(EndpointGroup::Order, BucketConfig::new(4, 4.0));
//! let limiter = RateLimiter::new(&config);
//! assert!(limiter.try_admit(EndpointGroup::Order));
//! ```

mod bucket;
mod group;
mod limiter;
mod remaining;

use std::collections::HashMap;

pub use bucket::TokenBucket;
pub use group::{EndpointGroup, UnknownGroup};
pub use limiter::RateLimiter;
pub use remaining::{REMAINING_REQ_HEADER, RemainingReq};

/// Capacity and refill rate of one group's bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketConfig {
    /// Maximum burst size.
    pub capacity: u32,
    /// Tokens added per second.
    pub refill_per_sec: f64,
}

impl BucketConfig {
    /// Used when no group has a configured bucket at all.
    pub const CONSERVATIVE: BucketConfig = BucketConfig {
        capacity: 1,
        refill_per_sec: 1.0,
    };

    /// Create a bucket configuration.
    pub const fn new(capacity: u32, refill_per_sec: f64) -> Self {
        Self {
            capacity,
            refill_per_sec,
        }
    }
}

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Bucket per group. Groups missing here share the most conservative bucket.
    pub buckets: HashMap<EndpointGroup, BucketConfig>,
    /// Whether to enable rate limiting.
    pub enabled: bool,
}

impl RateLimitConfig {
    /// Override the bucket for one group.
    pub fn with_bucket(mut self, group: EndpointGroup, bucket: BucketConfig) -> Self {
        self.buckets.insert(group, bucket);
        self
    }

    /// Remove a group's bucket so it falls back to the most conservative one.
    pub fn without_bucket(mut self, group: EndpointGroup) -> Self {
        self.buckets.remove(&group);
        self
    }

    /// Enable or disable rate limiting.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The configured group with the lowest refill rate (then lowest capacity).
    pub fn most_conservative(&self) -> Option<EndpointGroup> {
        self.buckets
            .iter()
            .min_by(|(ga, a), (gb, b)| {
                a.refill_per_sec
                    .total_cmp(&b.refill_per_sec)
                    .then(a.capacity.cmp(&b.capacity))
                    .then(ga.cmp(gb))
            })
            .map(|(group, _)| *group)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        let quotation =
            BucketConfig::new(limits::quotation::CAPACITY, limits::quotation::REFILL_PER_SEC);
        let buckets = HashMap::from([
            (EndpointGroup::Market, quotation),
            (EndpointGroup::Candle, quotation),
            (EndpointGroup::Trade, quotation),
            (EndpointGroup::Ticker, quotation),
            (EndpointGroup::Orderbook, quotation),
            (
                EndpointGroup::Default,
                BucketConfig::new(limits::exchange::CAPACITY, limits::exchange::REFILL_PER_SEC),
            ),
            (
                EndpointGroup::Order,
                BucketConfig::new(limits::order::CAPACITY, limits::order::REFILL_PER_SEC),
            ),
        ]);
        Self {
            buckets,
            enabled: true,
        }
    }
}

/// Published Upbit rate limits.
pub mod limits {
    /// Each quotation group.
    pub mod quotation {
        /// Maximum burst.
        pub const CAPACITY: u32 = 10;
        /// Requests per second.
        pub const REFILL_PER_SEC: f64 = 10.0;
    }

    /// Exchange endpoints other than order placement.
    pub mod exchange {
        /// Maximum burst.
        pub const CAPACITY: u32 = 30;
        /// Requests per second.
        pub const REFILL_PER_SEC: f64 = 30.0;
    }

    /// Order placement.
    pub mod order {
        /// Maximum burst.
        pub const CAPACITY: u32 = 8;
        /// Requests per second.
        pub const REFILL_PER_SEC: f64 = 8.0;
    }
}
