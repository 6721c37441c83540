//! Nonce generation for Upbit API authentication.
//!
//! Upbit rejects a token whose nonce was already seen for the same access key,
//! so every signed request needs a nonce that is never repeated.

use std::sync::atomic::{AtomicU64, Ordering};

/// Trait for providing nonces for authenticated requests.
///
/// Implementations must never return the same value twice.
pub trait NonceProvider: Send + Sync {
    /// Generate the next nonce value.
    fn next_nonce(&self) -> String;
}

/// Nonces built from the process start epoch and an atomic counter.
///
/// The epoch (milliseconds since UNIX epoch, taken at construction) separates
/// this process from earlier runs with the same key; the counter separates
/// requests within the process, including requests issued concurrently.
#[derive(Debug)]
pub struct EpochCounterNonce {
    epoch_millis: u64,
    counter: AtomicU64,
}

impl EpochCounterNonce {
    /// Create a new provider anchored at the current time.
    pub fn new() -> Self {
        Self::with_epoch(current_time_millis().max(0) as u64)
    }

    /// Create a provider with a fixed epoch.
    pub fn with_epoch(epoch_millis: u64) -> Self {
        Self {
            epoch_millis,
            counter: AtomicU64::new(0),
        }
    }
}

impl Default for EpochCounterNonce {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceProvider for EpochCounterNonce {
    fn next_nonce(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.epoch_millis, n)
    }
}

/// Milliseconds since the UNIX epoch, the clock shared by nonces and token timestamps.
pub(crate) fn current_time_millis() -> i64 {
    (time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Random UUID v4 nonces.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidNonce;

impl NonceProvider for UuidNonce {
    fn next_nonce(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_nonce_embeds_epoch() {
        let provider = EpochCounterNonce::with_epoch(1_700_000_000_000);
        assert_eq!(provider.next_nonce(), "1700000000000-0");
        assert_eq!(provider.next_nonce(), "1700000000000-1");
    }

    #[test]
    fn test_nonce_unique_across_threads() {
        let provider = Arc::new(EpochCounterNonce::new());
        let mut handles = vec![];

        for _ in 0..4 {
            let p = provider.clone();
            handles.push(thread::spawn(move || {
                let mut nonces = Vec::new();
                for _ in 0..1000 {
                    nonces.push(p.next_nonce());
                }
                nonces
            }));
        }

        let mut all_nonces = HashSet::new();
        for handle in handles {
            let nonces = handle.join().unwrap();
            for nonce in nonces {
                assert!(
                    all_nonces.insert(nonce),
                    "Nonce must be unique across threads"
                );
            }
        }
        assert_eq!(all_nonces.len(), 4000);
    }

    #[test]
    fn test_uuid_nonce_unique() {
        let provider = UuidNonce;
        let nonces: HashSet<String> = (0..100).map(|_| provider.next_nonce()).collect();
        assert_eq!(nonces.len(), 100);
    }
}
