/// Test data factories using builder pattern
///
/// Provides convenient methods to create test data with sensible defaults
use chrono::{DateTime, TimeZone, Utc};
use marquee_lib::modules::content::domain::{ContentItem, SearchResult};
use marquee_lib::shared::domain::value_objects::ContentType;
use uuid::Uuid;

pub struct ContentFactory {
    id: String,
    title: String,
    content_type: ContentType,
    image_url: Option<String>,
    is_premium: bool,
    is_new: bool,
    genres: Vec<String>,
    created_at: Option<DateTime<Utc>>,
}

impl Default for ContentFactory {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: "Test Movie".to_string(),
            content_type: ContentType::Movie,
            image_url: None,
            is_premium: false,
            is_new: false,
            genres: Vec::new(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single(),
        }
    }
}

impl ContentFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn series(mut self) -> Self {
        self.content_type = ContentType::Series;
        self
    }

    pub fn premium(mut self) -> Self {
        self.is_premium = true;
        self
    }

    pub fn new_release(mut self) -> Self {
        self.is_new = true;
        self
    }

    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genres.push(genre.into());
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn build_search_result(self) -> SearchResult {
        SearchResult {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            content_type: self.content_type,
        }
    }

    pub fn build_item(self) -> ContentItem {
        ContentItem {
            id: self.id,
            title: self.title,
            description: None,
            image_url: self.image_url,
            content_type: self.content_type,
            is_premium: self.is_premium,
            is_new: self.is_new,
            genres: self.genres,
            created_at: self.created_at,
        }
    }
}

/// `count` search rows titled "Item 00", "Item 01", ...
pub fn numbered_results(count: usize) -> Vec<SearchResult> {
    (0..count)
        .map(|i| {
            ContentFactory::new()
                .id(format!("item-{:02}", i))
                .title(format!("Item {:02}", i))
                .build_search_result()
        })
        .collect()
}

pub fn titled_results(titles: &[&str]) -> Vec<SearchResult> {
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            ContentFactory::new()
                .id(format!("c{}", i))
                .title(*title)
                .build_search_result()
        })
        .collect()
}
