use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::domain::value_objects::ContentType;

/// One row of the live search overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub image_url: Option<String>,
    pub content_type: ContentType,
}

impl SearchResult {
    /// Where selecting this result should take the viewer
    pub fn navigation_target(&self) -> NavigationTarget {
        NavigationTarget {
            content_id: self.id.clone(),
            content_type: self.content_type,
        }
    }
}

/// One page of a title search
///
/// `fetched` is the number of rows the store sent, counted before malformed
/// rows were dropped; pagination decides on it rather than on `results`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchPage {
    pub results: Vec<SearchResult>,
    pub fetched: usize,
}

impl SearchPage {
    pub fn new(results: Vec<SearchResult>, fetched: usize) -> Self {
        Self { results, fetched }
    }
}

impl From<Vec<SearchResult>> for SearchPage {
    fn from(results: Vec<SearchResult>) -> Self {
        let fetched = results.len();
        Self { results, fetched }
    }
}

/// Detail/player view a selection routes to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationTarget {
    pub content_id: String,
    pub content_type: ContentType,
}

impl NavigationTarget {
    pub fn path(&self) -> String {
        self.content_type.watch_path(&self.content_id)
    }
}

/// Full catalog row as listed on the storefront rails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub content_type: ContentType,
    pub is_premium: bool,
    pub is_new: bool,
    pub genres: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Content columns embedded in a watch-progress row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSummary {
    pub id: String,
    pub title: String,
    pub image_url: Option<String>,
    pub content_type: ContentType,
    pub is_premium: bool,
    pub is_new: bool,
}

/// "Continue watching" entry for a viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchProgressEntry {
    pub content: ContentSummary,
    pub progress_seconds: u64,
    pub last_watched_at: DateTime<Utc>,
}
