pub mod cache_entry;
pub mod config;

pub use cache_entry::CacheEntry;
pub use config::CacheConfig;
