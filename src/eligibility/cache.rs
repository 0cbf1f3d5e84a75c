//! LRU cache in front of an eligibility predicate

use super::HostEligibility;
use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use tokio::sync::Mutex;

/// Default number of host verdicts kept
pub const DEFAULT_CACHE_SIZE: usize = 1000;

/// Remembers the verdict of an inner predicate per hostname
///
/// The port is not part of the key: a host reached on several ports is
/// probed once.
///
/// Entries are never invalidated, only evicted when the cache is full.
pub struct CachedEligibility<E> {
    inner: E,
    cache: Mutex<LruCache<String, bool>>,
}

impl<E: HostEligibility> CachedEligibility<E> {
    /// Wraps `inner` with a cache of `size` entries (at least one)
    pub fn new(inner: E, size: usize) -> Self {
        let capacity = NonZeroUsize::new(size).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of cached verdicts
    pub async fn len(&self) -> usize {
        self.cache.lock().await.len()
    }
}

#[async_trait]
impl<E: HostEligibility> HostEligibility for CachedEligibility<E> {
    async fn is_eligible(&self, host: &str, port: Option<u16>) -> bool {
        if let Some(&verdict) = self.cache.lock().await.get(host) {
            return verdict;
        }

        // The lock is not held across the probe; concurrent misses for the
        // same host may both probe, and the later verdict wins.
        let verdict = self.inner.is_eligible(host, port).await;
        self.cache.lock().await.put(host.to_string(), verdict);
        verdict
    }
}
