use dashmap::DashMap;
use serde::Serialize;
use std::any::Any;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::modules::cache::domain::{CacheConfig, CacheEntry};

type StoredValue = Arc<dyn Any + Send + Sync>;

/// Cache statistics for monitoring
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries_count: usize,
    pub expired_cleanups: u64,
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            self.hits as f64 / (self.hits + self.misses) as f64
        }
    }
}

/// Process-wide response cache keyed by logical query name
///
/// Values of any `'static` type are stored type-erased and handed back by
/// clone. Expired entries read as absent and are removed on access; a
/// background sweep also drops them every `sweep_interval`.
pub struct ResponseCache {
    entries: Arc<DashMap<String, CacheEntry<StoredValue>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    cleanups: Arc<AtomicU64>,
    evictions: AtomicU64,
    config: CacheConfig,
    sweeper: CancellationToken,
    sweeper_started: AtomicBool,
}

impl ResponseCache {
    /// Create a cache; the sweep starts right away when a tokio runtime is
    /// available, otherwise call [`ResponseCache::start_sweeper`] later
    pub fn new(config: CacheConfig) -> Self {
        let cache = Self {
            entries: Arc::new(DashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            cleanups: Arc::new(AtomicU64::new(0)),
            evictions: AtomicU64::new(0),
            config,
            sweeper: CancellationToken::new(),
            sweeper_started: AtomicBool::new(false),
        };

        if tokio::runtime::Handle::try_current().is_ok() {
            cache.start_sweeper();
        }

        cache
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get a live value for `key`, or `None` when absent, expired, or stored
    /// under a different type
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let now = Instant::now();
        let lookup = self.entries.get(key).map(|entry| {
            if entry.is_expired_at(now) {
                None
            } else {
                Some((Arc::clone(&entry.data), entry.age()))
            }
        });

        let (value, age) = match lookup {
            Some(Some(found)) => found,
            Some(None) => {
                self.entries.remove_if(key, |_, entry| entry.is_expired_at(now));
                debug!(key, "removed expired cache entry");
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key, "cache miss");
                return None;
            }
        };

        match value.downcast_ref::<T>() {
            Some(data) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key, age_ms = age.as_millis() as u64, "cache hit");
                Some(data.clone())
            }
            None => {
                warn!(
                    key,
                    expected = std::any::type_name::<T>(),
                    "cache entry holds a different type, treating as miss"
                );
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store `data` under `key` for `ttl`, replacing any previous entry
    pub fn set<T>(&self, key: &str, data: T, ttl: Duration)
    where
        T: Send + Sync + 'static,
    {
        if self.entries.len() >= self.config.max_entries && !self.entries.contains_key(key) {
            self.evict_oldest_entries();
        }

        let stored: StoredValue = Arc::new(data);
        self.entries
            .insert(key.to_string(), CacheEntry::new(stored, ttl));
        debug!(key, ttl_ms = ttl.as_millis() as u64, "cached value");
    }

    /// Whether a non-expired entry exists for `key`
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry; returns how many were removed
    pub fn sweep_expired(&self) -> usize {
        let removed = sweep(&self.entries);
        if removed > 0 {
            self.cleanups.fetch_add(removed as u64, Ordering::Relaxed);
        }
        removed
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries_count: self.entries.len(),
            expired_cleanups: self.cleanups.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// Clear all cached entries and counters
    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.cleanups.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        info!("Response cache cleared");
    }

    /// Start the periodic sweep (idempotent). Must be called from within a
    /// tokio runtime.
    pub fn start_sweeper(&self) {
        let period = self.config.sweep_interval;
        if period.is_zero() {
            warn!("cache sweep interval is zero, background sweep disabled");
            return;
        }

        if self
            .sweeper_started
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return;
        }

        let entries = Arc::clone(&self.entries);
        let cleanups = Arc::clone(&self.cleanups);
        let token = self.sweeper.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        let removed = sweep(&entries);
                        if removed > 0 {
                            cleanups.fetch_add(removed as u64, Ordering::Relaxed);
                            debug!(removed, "swept expired cache entries");
                        }
                    }
                }
            }
        });
        debug!(period_secs = period.as_secs(), "cache sweeper started");
    }

    /// Evict oldest entries when the cache is full, down to 90% of capacity
    fn evict_oldest_entries(&self) {
        let mut by_age: Vec<(String, Instant)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().created_at))
            .collect();
        by_age.sort_by_key(|(_, created_at)| *created_at);

        let current_size = by_age.len();
        let target_size = (self.config.max_entries * 9) / 10;
        let to_evict = current_size.saturating_sub(target_size).max(1);

        for (key, _) in by_age.into_iter().take(to_evict) {
            self.entries.remove(&key);
        }
        self.evictions.fetch_add(to_evict as u64, Ordering::Relaxed);

        debug!(
            evicted = to_evict,
            before = current_size,
            after = self.entries.len(),
            "evicted old cache entries"
        );
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl Drop for ResponseCache {
    fn drop(&mut self) {
        self.sweeper.cancel();
    }
}

fn sweep(entries: &DashMap<String, CacheEntry<StoredValue>>) -> usize {
    let now = Instant::now();
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired_at(now));
    before.saturating_sub(entries.len())
}
