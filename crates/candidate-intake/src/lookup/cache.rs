use std::time::Duration;

use tracing::debug;

use super::domain::CachedLookup;
use crate::config::LookupConfig;
use crate::postal::PostalCode;

/// Storage abstraction for lookup results. Entries expire on their own; there is no
/// explicit invalidation.
pub trait LookupCache: Send + Sync {
    fn get(&self, code: &PostalCode) -> Option<CachedLookup>;
    fn put(&self, code: PostalCode, value: CachedLookup);
}

/// Process-local cache backed by Moka. Every entry shares one TTL counted from its
/// last write, and the entry count is bounded.
#[derive(Clone)]
pub struct MokaLookupCache {
    cache: moka::sync::Cache<PostalCode, CachedLookup>,
    ttl: Duration,
}

impl std::fmt::Debug for MokaLookupCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaLookupCache")
            .field("max_capacity", &self.cache.policy().max_capacity())
            .field("entry_count", &self.cache.entry_count())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl MokaLookupCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let cache = moka::sync::Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        debug!(
            max_capacity,
            ttl_seconds = ttl.as_secs(),
            "lookup cache created"
        );

        Self { cache, ttl }
    }

    pub fn from_config(config: &LookupConfig) -> Self {
        Self::new(config.cache_capacity, config.cache_ttl)
    }

    /// Approximate; pending evictions are applied lazily.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}

impl LookupCache for MokaLookupCache {
    fn get(&self, code: &PostalCode) -> Option<CachedLookup> {
        let hit = self.cache.get(code);
        if hit.is_some() {
            debug!(cep = %code, "lookup cache hit");
        } else {
            debug!(cep = %code, "lookup cache miss");
        }
        hit
    }

    fn put(&self, code: PostalCode, value: CachedLookup) {
        self.cache.insert(code, value);
    }
}
