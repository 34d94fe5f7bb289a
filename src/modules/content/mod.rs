pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::CatalogQueries;
pub use domain::{
    CatalogRepository, ContentItem, ContentSearchRepository, NavigationTarget, SearchPage,
    SearchRequest, SearchResult, WatchProgressEntry,
};
pub use infrastructure::{ContentStoreClient, StoreConfig};
