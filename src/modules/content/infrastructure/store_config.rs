use std::time::Duration;

/// Connection settings for the remote content store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    pub base_url: String,
    /// Public (anon) API key sent with every request
    pub api_key: String,
    pub timeout: Duration,
    /// Client-side ceiling on request rate
    pub requests_per_second: f64,
    pub burst_size: u32,
    pub user_agent: String,
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
            requests_per_second: 10.0,
            burst_size: 5,
            user_agent: format!("marquee/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Root of the REST interface
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.base_url)
    }
}
