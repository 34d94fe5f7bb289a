use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::entities::{ContentItem, SearchPage, WatchProgressEntry};
use crate::shared::{
    application::PaginationParams, domain::value_objects::ContentType, errors::AppResult,
};

/// A single page of a title search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub title_substring: String,
    pub pagination: PaginationParams,
}

impl SearchRequest {
    pub fn new(title_substring: impl Into<String>, pagination: PaginationParams) -> Self {
        Self {
            title_substring: title_substring.into(),
            pagination,
        }
    }

    pub fn limit(&self) -> u64 {
        self.pagination.limit()
    }

    pub fn offset(&self) -> u64 {
        self.pagination.offset()
    }
}

/// Title search against the remote content store
///
/// Matches are case-insensitive substrings of the title, ordered by title
/// ascending with the id as tie-break so pages never overlap.
#[async_trait]
pub trait ContentSearchRepository: Send + Sync {
    async fn search_content(&self, request: &SearchRequest) -> AppResult<SearchPage>;
}

/// Named catalog reads used by the storefront rails
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Items flagged as new, newest first
    async fn new_releases(&self, limit: u32) -> AppResult<Vec<ContentItem>>;

    /// Items created at or after `since`, newest first
    async fn recently_added(&self, since: DateTime<Utc>, limit: u32)
        -> AppResult<Vec<ContentItem>>;

    /// One page (0-based) of a single content type, newest first
    async fn list_by_type(
        &self,
        content_type: ContentType,
        page: u32,
        limit: u32,
    ) -> AppResult<Vec<ContentItem>>;

    /// Items of a type tagged with `genre`, newest first
    async fn by_genre(
        &self,
        genre: &str,
        content_type: ContentType,
        limit: u32,
    ) -> AppResult<Vec<ContentItem>>;

    /// The viewer's most recently watched items
    async fn watch_progress(&self, user_id: &str, limit: u32)
        -> AppResult<Vec<WatchProgressEntry>>;
}
