use chrono::{DateTime, Utc};
use serde_json::Value;

use super::dto::{ContentRowDto, WatchProgressRowDto};
use crate::modules::content::domain::{
    ContentItem, ContentSummary, SearchResult, WatchProgressEntry,
};
use crate::shared::{
    domain::value_objects::ContentType,
    errors::{AppError, AppResult},
};

/// Validates raw store rows and converts them into domain entities
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentMapper;

impl ContentMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn to_search_result(&self, row: ContentRowDto) -> AppResult<SearchResult> {
        let id = coerce_id(&row.id)?;
        let title = required_title(row.title, &id)?;
        let content_type = parse_content_type(row.content_type.as_deref(), &id)?;

        Ok(SearchResult {
            id,
            title,
            image_url: non_blank(row.image_url),
            content_type,
        })
    }

    pub fn to_content_item(&self, row: ContentRowDto) -> AppResult<ContentItem> {
        let id = coerce_id(&row.id)?;
        let title = required_title(row.title, &id)?;
        let content_type = parse_content_type(row.content_type.as_deref(), &id)?;
        let created_at = match row.created_at.as_deref() {
            Some(raw) => Some(parse_timestamp(raw)?),
            None => None,
        };

        Ok(ContentItem {
            id,
            title,
            description: non_blank(row.description),
            image_url: non_blank(row.image_url),
            content_type,
            is_premium: row.is_premium.unwrap_or(false),
            is_new: row.is_new.unwrap_or(false),
            genres: row.genres.unwrap_or_default(),
            created_at,
        })
    }

    pub fn to_watch_progress(&self, row: WatchProgressRowDto) -> AppResult<WatchProgressEntry> {
        let content = row.content.ok_or_else(|| {
            AppError::ValidationError("Watch progress row without content".to_string())
        })?;
        let id = coerce_id(&content.id)?;
        let summary = ContentSummary {
            title: required_title(content.title, &id)?,
            content_type: parse_content_type(content.content_type.as_deref(), &id)?,
            image_url: non_blank(content.image_url),
            is_premium: content.is_premium.unwrap_or(false),
            is_new: content.is_new.unwrap_or(false),
            id,
        };

        let progress_seconds = match row.progress_seconds {
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
                .unwrap_or(0),
            _ => 0,
        };

        let last_watched_at = row
            .last_watched_at
            .as_deref()
            .map(parse_timestamp)
            .transpose()?
            .ok_or_else(|| {
                AppError::ValidationError(format!(
                    "Watch progress for '{}' has no last_watched_at",
                    summary.id
                ))
            })?;

        Ok(WatchProgressEntry {
            content: summary,
            progress_seconds,
            last_watched_at,
        })
    }

    /// Map every row, dropping (and logging) the ones that fail validation
    pub fn map_rows<D, T, F>(&self, rows: Vec<D>, what: &str, map: F) -> Vec<T>
    where
        F: Fn(&Self, D) -> AppResult<T>,
    {
        let total = rows.len();
        let mapped: Vec<T> = rows
            .into_iter()
            .filter_map(|row| match map(self, row) {
                Ok(item) => Some(item),
                Err(e) => {
                    log::warn!("Dropping malformed {} row: {}", what, e);
                    None
                }
            })
            .collect();

        if mapped.len() < total {
            log::debug!("Kept {}/{} {} rows", mapped.len(), total, what);
        }
        mapped
    }
}

/// Ids arrive as UUID strings or integers depending on the table
fn coerce_id(raw: &Value) -> AppResult<String> {
    match raw {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(AppError::ValidationError(format!(
            "Content row has no usable id: {}",
            other
        ))),
    }
}

fn required_title(title: Option<String>, id: &str) -> AppResult<String> {
    non_blank(title)
        .ok_or_else(|| AppError::ValidationError(format!("Content '{}' has no title", id)))
}

fn parse_content_type(raw: Option<&str>, id: &str) -> AppResult<ContentType> {
    raw.ok_or_else(|| {
        AppError::ValidationError(format!("Content '{}' has no content_type", id))
    })?
    .parse()
}

fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
