use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{
    dto::{ContentRowDto, WatchProgressRowDto},
    filters::{self, RestQuery, CATALOG_COLUMNS, SEARCH_COLUMNS, WATCH_PROGRESS_COLUMNS},
    mapper::ContentMapper,
};
use crate::modules::content::{
    domain::{
        CatalogRepository, ContentItem, ContentSearchRepository, SearchPage, SearchRequest,
        WatchProgressEntry,
    },
    infrastructure::{http_client::RateLimitClient, store_config::StoreConfig},
};
use crate::shared::{
    domain::value_objects::ContentType,
    errors::AppResult,
    utils::{LogContext, StoreTimer},
};

const CONTENT_TABLE: &str = "content";
const WATCH_PROGRESS_TABLE: &str = "watch_progress";
const NEWEST_FIRST: &str = "created_at.desc";

/// Ordering for title search. Title alone is not unique, so the id keeps
/// offset pagination stable.
const SEARCH_ORDER: &str = "title.asc,id.asc";

/// Remote content store reached over its REST interface
pub struct ContentStoreClient {
    http_client: RateLimitClient,
    rest_url: String,
    mapper: ContentMapper,
}

impl ContentStoreClient {
    pub fn new(config: &StoreConfig) -> AppResult<Self> {
        Ok(Self::with_client(
            RateLimitClient::for_content_store(config)?,
            config.rest_url(),
        ))
    }

    /// Create client with custom HTTP client (for testing)
    pub fn with_client(http_client: RateLimitClient, rest_url: String) -> Self {
        Self {
            http_client,
            rest_url,
            mapper: ContentMapper::new(),
        }
    }

    async fn fetch_content(&self, resource: &str, query: RestQuery) -> AppResult<Vec<ContentItem>> {
        let url = query.to_url(&self.rest_url, CONTENT_TABLE);
        let timer = StoreTimer::start(resource);
        LogContext::store_call(resource, "started", None);

        let rows: Vec<ContentRowDto> = self
            .http_client
            .get_json(&url)
            .await
            .inspect_err(|e| LogContext::store_failure(resource, e))?;
        let fetched = rows.len();
        let items = self
            .mapper
            .map_rows(rows, resource, ContentMapper::to_content_item);

        let elapsed = timer.finish_with_rows(items.len(), fetched);
        LogContext::store_call(resource, "ok", Some(elapsed));
        Ok(items)
    }
}

#[async_trait]
impl ContentSearchRepository for ContentStoreClient {
    async fn search_content(&self, request: &SearchRequest) -> AppResult<SearchPage> {
        let url = RestQuery::select(SEARCH_COLUMNS)
            .ilike_contains("title", &request.title_substring)
            .order(SEARCH_ORDER)
            .limit(request.limit())
            .offset(request.offset())
            .to_url(&self.rest_url, CONTENT_TABLE);

        let timer = StoreTimer::start(&format!(
            "search '{}' offset {}",
            request.title_substring,
            request.offset()
        ));
        let rows: Vec<ContentRowDto> = self.http_client.get_json(&url).await?;
        let fetched = rows.len();
        let results = self
            .mapper
            .map_rows(rows, "search", ContentMapper::to_search_result);
        timer.finish_with_rows(results.len(), fetched);

        Ok(SearchPage::new(results, fetched))
    }
}

#[async_trait]
impl CatalogRepository for ContentStoreClient {
    async fn new_releases(&self, limit: u32) -> AppResult<Vec<ContentItem>> {
        let query = RestQuery::select(CATALOG_COLUMNS)
            .eq("is_new", true)
            .order(NEWEST_FIRST)
            .limit(limit as u64);
        self.fetch_content("new releases", query).await
    }

    async fn recently_added(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> AppResult<Vec<ContentItem>> {
        let query = RestQuery::select(CATALOG_COLUMNS)
            .gte("created_at", filters::timestamp(since))
            .order(NEWEST_FIRST)
            .limit(limit as u64);
        self.fetch_content("recently added", query).await
    }

    async fn list_by_type(
        &self,
        content_type: ContentType,
        page: u32,
        limit: u32,
    ) -> AppResult<Vec<ContentItem>> {
        let query = RestQuery::select(CATALOG_COLUMNS)
            .eq("content_type", content_type)
            .order(NEWEST_FIRST)
            .limit(limit as u64)
            .offset(page as u64 * limit as u64);
        self.fetch_content(&format!("{} listing", content_type), query)
            .await
    }

    async fn by_genre(
        &self,
        genre: &str,
        content_type: ContentType,
        limit: u32,
    ) -> AppResult<Vec<ContentItem>> {
        let query = RestQuery::select(CATALOG_COLUMNS)
            .contains("genres", &[genre])
            .eq("content_type", content_type)
            .order(NEWEST_FIRST)
            .limit(limit as u64);
        self.fetch_content(&format!("{} genre '{}'", content_type, genre), query)
            .await
    }

    async fn watch_progress(
        &self,
        user_id: &str,
        limit: u32,
    ) -> AppResult<Vec<WatchProgressEntry>> {
        let url = RestQuery::select(WATCH_PROGRESS_COLUMNS)
            .eq("user_id", user_id)
            .order("last_watched_at.desc")
            .limit(limit as u64)
            .to_url(&self.rest_url, WATCH_PROGRESS_TABLE);

        let timer = StoreTimer::start("watch progress");
        let rows: Vec<WatchProgressRowDto> = self
            .http_client
            .get_json(&url)
            .await
            .inspect_err(|e| LogContext::store_failure("watch progress", e))?;
        let entries = self
            .mapper
            .map_rows(rows, "watch progress", ContentMapper::to_watch_progress);
        timer.finish();

        Ok(entries)
    }
}
