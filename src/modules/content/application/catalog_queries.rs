use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;

use crate::modules::cache::{CachedQuery, CachedQueryOptions, ResponseCache};
use crate::modules::content::domain::{CatalogRepository, ContentItem, WatchProgressEntry};
use crate::shared::domain::value_objects::ContentType;

pub const NEW_RELEASES_LIMIT: u32 = 6;
pub const RECENTLY_ADDED_LIMIT: u32 = 12;
pub const RECENTLY_ADDED_WINDOW_DAYS: i64 = 15;
pub const LISTING_PAGE_SIZE: u32 = 12;
pub const GENRE_LIMIT: u32 = 12;
pub const WATCH_PROGRESS_LIMIT: u32 = 24;

/// Factory for the storefront's cached catalog reads
///
/// Each method binds one catalog read to a stable cache key, so every view
/// asking for the same rail shares one cache entry.
#[derive(Clone)]
pub struct CatalogQueries {
    repository: Arc<dyn CatalogRepository>,
    cache: Arc<ResponseCache>,
}

impl CatalogQueries {
    pub fn new(repository: Arc<dyn CatalogRepository>, cache: Arc<ResponseCache>) -> Self {
        Self { repository, cache }
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn new_releases(&self, options: CachedQueryOptions) -> CachedQuery<Vec<ContentItem>> {
        let repository = Arc::clone(&self.repository);
        CachedQuery::new(
            Arc::clone(&self.cache),
            "catalog:new_releases",
            move || {
                let repository = Arc::clone(&repository);
                async move { repository.new_releases(NEW_RELEASES_LIMIT).await }
            },
            options,
        )
    }

    /// Items added in the last 15 days; the window is computed per fetch
    pub fn recently_added(&self, options: CachedQueryOptions) -> CachedQuery<Vec<ContentItem>> {
        let repository = Arc::clone(&self.repository);
        CachedQuery::new(
            Arc::clone(&self.cache),
            "catalog:recently_added",
            move || {
                let repository = Arc::clone(&repository);
                async move {
                    let since = Utc::now() - ChronoDuration::days(RECENTLY_ADDED_WINDOW_DAYS);
                    repository.recently_added(since, RECENTLY_ADDED_LIMIT).await
                }
            },
            options,
        )
    }

    /// One 0-based page of movies or series
    pub fn listing(
        &self,
        content_type: ContentType,
        page: u32,
        options: CachedQueryOptions,
    ) -> CachedQuery<Vec<ContentItem>> {
        let repository = Arc::clone(&self.repository);
        CachedQuery::new(
            Arc::clone(&self.cache),
            listing_key(content_type, page, LISTING_PAGE_SIZE),
            move || {
                let repository = Arc::clone(&repository);
                async move {
                    repository
                        .list_by_type(content_type, page, LISTING_PAGE_SIZE)
                        .await
                }
            },
            options,
        )
    }

    pub fn by_genre(
        &self,
        genre: &str,
        content_type: ContentType,
        options: CachedQueryOptions,
    ) -> CachedQuery<Vec<ContentItem>> {
        let repository = Arc::clone(&self.repository);
        let genre = genre.trim().to_string();
        CachedQuery::new(
            Arc::clone(&self.cache),
            format!("catalog:genre:{}:{}", content_type, genre.to_lowercase()),
            move || {
                let repository = Arc::clone(&repository);
                let genre = genre.clone();
                async move {
                    repository
                        .by_genre(&genre, content_type, GENRE_LIMIT)
                        .await
                }
            },
            options,
        )
    }

    /// Continue-watching rail; disabled for anonymous viewers
    pub fn watch_progress(
        &self,
        user_id: &str,
        options: CachedQueryOptions,
    ) -> CachedQuery<Vec<WatchProgressEntry>> {
        let repository = Arc::clone(&self.repository);
        let user_id = user_id.trim().to_string();
        let enabled = options.enabled && !user_id.is_empty();
        CachedQuery::new(
            Arc::clone(&self.cache),
            format!("watch_progress:{}", user_id),
            move || {
                let repository = Arc::clone(&repository);
                let user_id = user_id.clone();
                async move {
                    repository
                        .watch_progress(&user_id, WATCH_PROGRESS_LIMIT)
                        .await
                }
            },
            options.enabled(enabled),
        )
    }
}

pub fn listing_key(content_type: ContentType, page: u32, limit: u32) -> String {
    format!("catalog:{}:page={}:limit={}", content_type, page, limit)
}
