use serde::Deserialize;
use serde_json::Value;

/// Raw `content` row as returned by the store; every column is optional
/// because the select list varies per read
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentRowDto {
    #[serde(default)]
    pub id: Value,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub content_type: Option<String>,
    pub is_premium: Option<bool>,
    pub is_new: Option<bool>,
    pub genres: Option<Vec<String>>,
    pub created_at: Option<String>,
}

/// Raw `watch_progress` row with the embedded content
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchProgressRowDto {
    pub content: Option<ContentRowDto>,
    pub progress_seconds: Option<Value>,
    pub last_watched_at: Option<String>,
}
