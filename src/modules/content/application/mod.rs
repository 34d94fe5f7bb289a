pub mod catalog_queries;

pub use catalog_queries::CatalogQueries;
