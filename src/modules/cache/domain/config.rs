use std::time::Duration;

/// Tuning for the shared response cache and the queries built on it
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL used when a query does not set its own
    pub default_ttl: Duration,

    /// Minimum gap between two non-forced fetch attempts of one query
    pub min_refetch_interval: Duration,

    /// How often the background sweep drops expired entries
    pub sweep_interval: Duration,

    /// Upper bound on stored entries; the oldest are evicted past it
    pub max_entries: usize,
}

impl CacheConfig {
    pub fn new() -> Self {
        Self {
            default_ttl: Duration::from_secs(5 * 60),
            min_refetch_interval: Duration::from_secs(2),
            sweep_interval: Duration::from_secs(60),
            max_entries: 1000,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new()
    }
}
