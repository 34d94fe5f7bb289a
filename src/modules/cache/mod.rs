pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{CachedQuery, CachedQueryOptions, FetchOutcome, QueryState};
pub use domain::{CacheConfig, CacheEntry};
pub use infrastructure::{CacheStats, ResponseCache};
