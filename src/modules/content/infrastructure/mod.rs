pub mod http_client;
pub mod postgrest;
pub mod store_config;

pub use postgrest::ContentStoreClient;
pub use store_config::StoreConfig;
