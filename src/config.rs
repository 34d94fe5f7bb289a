//! Environment-driven configuration
//!
//! Values come from the process environment (after `.env` is loaded by
//! `dotenvy`). Only the store URL and key are required.

use std::time::Duration;

use crate::modules::cache::CacheConfig;
use crate::modules::content::StoreConfig;
use crate::modules::search::SearchConfig;
use crate::shared::errors::{AppError, AppResult};

pub const STORE_URL_VAR: &str = "CONTENT_STORE_URL";
pub const STORE_KEY_VAR: &str = "CONTENT_STORE_ANON_KEY";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub search: SearchConfig,
    pub cache: CacheConfig,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any name → value lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = Self::validated_store_url(lookup(STORE_URL_VAR))?;
        let api_key = lookup(STORE_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AppError::ConfigError(format!("{} environment variable not found", STORE_KEY_VAR))
            })?;

        let mut store = StoreConfig::new(base_url, api_key);
        if let Some(secs) = parse_positive(&lookup, "CONTENT_STORE_TIMEOUT_SECS")? {
            store.timeout = Duration::from_secs(secs);
        }
        if let Some(rps) = parse_positive(&lookup, "CONTENT_STORE_REQUESTS_PER_SECOND")? {
            store.requests_per_second = rps as f64;
        }

        let mut search = SearchConfig::default();
        if let Some(ms) = parse_positive(&lookup, "SEARCH_DEBOUNCE_MS")? {
            search.debounce = Duration::from_millis(ms);
        }
        if let Some(size) = parse_positive(&lookup, "SEARCH_PAGE_SIZE")? {
            search.page_size = u32::try_from(size).map_err(|_| {
                AppError::ValidationError(format!("SEARCH_PAGE_SIZE too large: {}", size))
            })?;
        }

        let mut cache = CacheConfig::default();
        if let Some(secs) = parse_positive(&lookup, "CACHE_DEFAULT_TTL_SECS")? {
            cache.default_ttl = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_positive(&lookup, "CACHE_MIN_REFETCH_INTERVAL_MS")? {
            cache.min_refetch_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_positive(&lookup, "CACHE_SWEEP_INTERVAL_SECS")? {
            cache.sweep_interval = Duration::from_secs(secs);
        }

        Ok(Self {
            store,
            search,
            cache,
        })
    }

    fn validated_store_url(raw: Option<String>) -> AppResult<String> {
        let url = raw.map(|u| u.trim().to_string()).ok_or_else(|| {
            AppError::ConfigError(format!("{} environment variable not found", STORE_URL_VAR))
        })?;

        if !url.starts_with("https://") && !url.starts_with("http://") {
            return Err(AppError::ConfigError(format!(
                "Invalid {}. Must start with http:// or https://",
                STORE_URL_VAR
            )));
        }

        crate::log_info!("Using content store at {}", url);
        Ok(url)
    }
}

fn parse_positive<F>(lookup: &F, name: &str) -> AppResult<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => {
            let value: u64 = raw.trim().parse().map_err(|_| {
                AppError::ValidationError(format!("{} must be a positive integer, got '{}'", name, raw))
            })?;
            if value == 0 {
                return Err(AppError::ValidationError(format!("{} must be greater than zero", name)));
            }
            Ok(Some(value))
        }
    }
}
