//! In-process TTL cache for static lists (countries, currencies, ...).
//!
//! Keyed by namespace. Expired entries are not evicted on read: they stay
//! behind as the serve-stale fallback when a refetch fails, so a backend
//! outage degrades static lists to slightly old data instead of errors.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;
use tracing::{debug, warn};

use admingate_core::{GatewayError, Result};

#[derive(Clone, Debug)]
struct CachedEntry {
    data: Arc<Value>,
    cached_at: Instant,
}

impl CachedEntry {
    fn new(data: Value) -> Self {
        Self {
            data: Arc::new(data),
            cached_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        // >= so a zero TTL means "refetch every time"
        self.cached_at.elapsed() >= ttl
    }
}

#[derive(Clone)]
pub struct StaticListCache {
    entries: Arc<DashMap<String, CachedEntry>>,
    ttl: Duration,
}

impl StaticListCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Return the cached value for `namespace`, fetching on miss or expiry.
    ///
    /// On fetch failure a stale entry, if present, is served instead of the
    /// error; with no entry at all the error surfaces to the caller.
    pub async fn get_or_fetch<F, Fut>(&self, namespace: &str, fetch: F) -> Result<Arc<Value>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<Value, GatewayError>>,
    {
        // Clone out of the map so no shard lock is held across the await.
        let existing = self
            .entries
            .get(namespace)
            .map(|entry| (entry.data.clone(), entry.is_expired(self.ttl)));

        if let Some((data, expired)) = &existing {
            if !expired {
                debug!(namespace, "static list served from cache");
                return Ok(data.clone());
            }
        }

        match fetch().await {
            Ok(value) => {
                let entry = CachedEntry::new(value);
                let data = entry.data.clone();
                self.entries.insert(namespace.to_string(), entry);
                debug!(namespace, "static list refreshed");
                Ok(data)
            }
            Err(err) => match existing {
                Some((stale, _)) => {
                    warn!(namespace, error = %err, "static list fetch failed, serving stale entry");
                    Ok(stale)
                }
                None => Err(err),
            },
        }
    }
}
