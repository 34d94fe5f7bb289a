pub mod entities;
pub mod repositories;

pub use entities::{
    ContentItem, ContentSummary, NavigationTarget, SearchPage, SearchResult, WatchProgressEntry,
};
pub use repositories::{CatalogRepository, ContentSearchRepository, SearchRequest};
