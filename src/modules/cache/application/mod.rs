pub mod cached_query;

pub use cached_query::{CachedQuery, CachedQueryOptions, FetchOutcome, QueryState};
