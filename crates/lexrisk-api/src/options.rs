//! Memoized remote option documents for select inputs.
//!
//! Keyed by the fully resolved request URL and holding the raw response body,
//! so selects reading the same URL through different keys share one fetch.
//! An entry is served without refetching while fresh, and dropped once unused
//! for the idle window. Concurrent requests for the same key share one fetch.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde_json::Value;
use tracing::debug;

use crate::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// How long a fetched document is reused before it is fetched again.
    pub fresh_for: Duration,
    /// How long an unused document is kept before eviction.
    pub evict_after_idle: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            fresh_for: Duration::from_secs(5 * 60),
            evict_after_idle: Duration::from_secs(10 * 60),
        }
    }
}

#[derive(Clone)]
pub struct OptionCache {
    cache: Cache<String, Arc<Value>>,
    policy: CachePolicy,
}

impl Default for OptionCache {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

impl OptionCache {
    pub fn new(policy: CachePolicy) -> Self {
        let cache = Cache::builder()
            .time_to_live(policy.fresh_for)
            .time_to_idle(policy.evict_after_idle)
            .build();
        Self { cache, policy }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Return the cached document for `key`, running `fetch` only on a miss.
    /// Failed fetches are not cached.
    pub async fn get_or_fetch<F>(&self, key: &str, fetch: F) -> Result<Arc<Value>, ApiError>
    where
        F: Future<Output = Result<Value, ApiError>>,
    {
        let key = key.to_string();
        self.cache
            .try_get_with(key.clone(), async move {
                debug!(key = %key, "option cache miss");
                fetch.await.map(Arc::new)
            })
            .await
            .map_err(|e| (*e).clone())
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.cache.get(key).await.is_some()
    }

    pub async fn invalidate(&self, key: &str) {
        self.cache.invalidate(key).await;
    }
}
