/// Hand-written repository fakes
///
/// `ScriptedSearchRepository` answers from an in-memory dataset the way the
/// content store would (case-insensitive contains, title then id order) and
/// can delay or fail specific queries to stage races.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use marquee_lib::modules::content::domain::{
    CatalogRepository, ContentItem, ContentSearchRepository, SearchPage, SearchRequest,
    SearchResult, WatchProgressEntry,
};
use marquee_lib::shared::domain::value_objects::ContentType;
use marquee_lib::shared::errors::{AppError, AppResult};

#[derive(Default)]
pub struct ScriptedSearchRepository {
    dataset: Vec<SearchResult>,
    delays: HashMap<String, Duration>,
    failing: HashSet<String>,
    calls: AtomicUsize,
    requests: Mutex<Vec<SearchRequest>>,
}

impl ScriptedSearchRepository {
    pub fn new(dataset: Vec<SearchResult>) -> Self {
        Self {
            dataset,
            ..Default::default()
        }
    }

    /// Delay responses for an exact query text
    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn failing_on(mut self, query: &str) -> Self {
        self.failing.insert(query.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentSearchRepository for ScriptedSearchRepository {
    async fn search_content(&self, request: &SearchRequest) -> AppResult<SearchPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delays.get(&request.title_substring) {
            tokio::time::sleep(*delay).await;
        }

        if self.failing.contains(&request.title_substring) {
            return Err(AppError::ExternalServiceError(
                "content store unavailable".to_string(),
            ));
        }

        let needle = request.title_substring.to_lowercase();
        let mut matches: Vec<SearchResult> = self
            .dataset
            .iter()
            .filter(|row| row.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));

        let page: Vec<SearchResult> = matches
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.limit() as usize)
            .collect();
        Ok(page.into())
    }
}

/// Catalog fake recording which read was called with which arguments
#[derive(Default)]
pub struct FakeCatalogRepository {
    pub items: Vec<ContentItem>,
    pub progress: Vec<WatchProgressEntry>,
    pub fail: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeCatalogRepository {
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> AppResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            Err(AppError::ApiError("HTTP 500: boom".to_string()))
        } else {
            Ok(())
        }
    }

    fn of_type(&self, content_type: ContentType) -> impl Iterator<Item = &ContentItem> {
        self.items
            .iter()
            .filter(move |item| item.content_type == content_type)
    }
}

#[async_trait]
impl CatalogRepository for FakeCatalogRepository {
    async fn new_releases(&self, limit: u32) -> AppResult<Vec<ContentItem>> {
        self.record(format!("new_releases:{}", limit))?;
        Ok(self
            .items
            .iter()
            .filter(|item| item.is_new)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn recently_added(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> AppResult<Vec<ContentItem>> {
        self.record(format!("recently_added:{}", limit))?;
        Ok(self
            .items
            .iter()
            .filter(|item| item.created_at.is_some_and(|at| at >= since))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn list_by_type(
        &self,
        content_type: ContentType,
        page: u32,
        limit: u32,
    ) -> AppResult<Vec<ContentItem>> {
        self.record(format!("list_by_type:{}:{}:{}", content_type, page, limit))?;
        Ok(self
            .of_type(content_type)
            .skip((page * limit) as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn by_genre(
        &self,
        genre: &str,
        content_type: ContentType,
        limit: u32,
    ) -> AppResult<Vec<ContentItem>> {
        self.record(format!("by_genre:{}:{}:{}", genre, content_type, limit))?;
        Ok(self
            .of_type(content_type)
            .filter(|item| item.genres.iter().any(|g| g == genre))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn watch_progress(
        &self,
        user_id: &str,
        limit: u32,
    ) -> AppResult<Vec<WatchProgressEntry>> {
        self.record(format!("watch_progress:{}:{}", user_id, limit))?;
        Ok(self.progress.iter().take(limit as usize).cloned().collect())
    }
}
