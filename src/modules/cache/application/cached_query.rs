//! `{data, loading, error, refetch}` surface over the response cache
//!
//! A `CachedQuery` is what one consuming view holds for one logical read. It
//! serves live cache entries without touching the network, throttles
//! non-forced fetches to one per `min_refetch_interval`, and keeps the last
//! good value visible when a fetch fails.

use futures::future::BoxFuture;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::time::Instant;
use tracing::debug;

use crate::modules::cache::infrastructure::ResponseCache;
use crate::shared::errors::{AppError, AppResult};

type QueryFn<T> = Arc<dyn Fn() -> BoxFuture<'static, AppResult<T>> + Send + Sync>;

/// Per-query options
#[derive(Debug, Clone)]
pub struct CachedQueryOptions {
    /// Validity window; `None` uses the cache's default TTL
    pub ttl: Option<Duration>,
    /// While false no fetch happens at all
    pub enabled: bool,
    /// Re-validate when the consuming view regains focus
    pub refetch_on_focus: bool,
}

impl Default for CachedQueryOptions {
    fn default() -> Self {
        Self {
            ttl: None,
            enabled: true,
            refetch_on_focus: false,
        }
    }
}

impl CachedQueryOptions {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn refetch_on_focus(mut self, refetch: bool) -> Self {
        self.refetch_on_focus = refetch;
        self
    }
}

/// What a consuming view renders from
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<AppError>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

/// How a fetch cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Served from a live cache entry
    CacheHit,
    /// Went to the remote store and stored the result
    Fetched,
    /// The remote read failed; `error` is set
    Failed,
    /// Skipped because the previous attempt was too recent
    Throttled,
    /// Skipped because the query is disabled
    Disabled,
}

pub struct CachedQuery<T> {
    cache: Arc<ResponseCache>,
    key: String,
    query_fn: QueryFn<T>,
    ttl: Duration,
    refetch_on_focus: bool,
    enabled: AtomicBool,
    last_fetch: Mutex<Option<Instant>>,
    state: watch::Sender<QueryState<T>>,
}

impl<T> CachedQuery<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(
        cache: Arc<ResponseCache>,
        key: impl Into<String>,
        query_fn: F,
        options: CachedQueryOptions,
    ) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        let ttl = options.ttl.unwrap_or(cache.config().default_ttl);
        let (state, _) = watch::channel(QueryState::default());

        Self {
            cache,
            key: key.into(),
            query_fn: Arc::new(move || Box::pin(query_fn()) as BoxFuture<'static, AppResult<T>>),
            ttl,
            refetch_on_focus: options.refetch_on_focus,
            enabled: AtomicBool::new(options.enabled),
            last_fetch: Mutex::new(None),
            state,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Mount/key-change cycle: cache first, then a throttled fetch
    pub async fn load(&self) -> FetchOutcome {
        self.fetch(false).await
    }

    /// Always performs a live fetch and overwrites the cache on success
    pub async fn refetch(&self) -> FetchOutcome {
        self.fetch(true).await
    }

    /// Consuming view regained focus; `None` when focus refetch is off
    pub async fn on_focus(&self) -> Option<FetchOutcome> {
        if self.refetch_on_focus {
            Some(self.refetch().await)
        } else {
            None
        }
    }

    /// Flip the enabled gate; turning it on runs a load cycle
    pub async fn set_enabled(&self, enabled: bool) -> Option<FetchOutcome> {
        let was = self.enabled.swap(enabled, Ordering::AcqRel);
        if enabled && !was {
            Some(self.load().await)
        } else {
            None
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn state(&self) -> QueryState<T> {
        self.state.borrow().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.state.borrow().data.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<AppError> {
        self.state.borrow().error.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState<T>> {
        self.state.subscribe()
    }

    async fn fetch(&self, force: bool) -> FetchOutcome {
        if !self.is_enabled() {
            return FetchOutcome::Disabled;
        }

        if !force {
            if let Some(cached) = self.cache.get::<T>(&self.key) {
                self.state.send_modify(|state| {
                    state.data = Some(cached);
                    state.loading = false;
                });
                return FetchOutcome::CacheHit;
            }
        }

        {
            let now = Instant::now();
            let mut last_fetch = self.last_fetch.lock().await;
            let min_interval = self.cache.config().min_refetch_interval;
            if !force
                && last_fetch.is_some_and(|at| now.saturating_duration_since(at) < min_interval)
            {
                debug!(key = %self.key, "fetch throttled");
                return FetchOutcome::Throttled;
            }
            *last_fetch = Some(now);
        }

        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        match (self.query_fn)().await {
            Ok(value) => {
                self.cache.set(&self.key, value.clone(), self.ttl);
                self.state.send_modify(|state| {
                    state.data = Some(value);
                    state.loading = false;
                });
                debug!(key = %self.key, force, "query fetched");
                FetchOutcome::Fetched
            }
            Err(e) => {
                log::warn!("Cached query '{}' failed: {}", self.key, e);
                self.state.send_modify(|state| {
                    state.error = Some(e);
                    state.loading = false;
                });
                FetchOutcome::Failed
            }
        }
    }
}
