//! HTTP client for the content store with client-side rate limiting
//!
//! Every request waits on a governor quota, carries the store's API key, and
//! has its status mapped onto `AppError`. Failures are returned as-is; callers
//! decide whether to surface or swallow them.

use crate::modules::content::infrastructure::store_config::StoreConfig;
use crate::shared::errors::{AppError, AppResult};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use reqwest::{Client, Response};
use std::num::NonZeroU32;
use std::time::Duration;

type DirectRateLimiter = GovernorRateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
    governor::middleware::NoOpMiddleware,
>;

const ERROR_EXCERPT_CHARS: usize = 200;

/// Rate-limited HTTP client bound to one remote service
pub struct RateLimitClient {
    client: Client,
    rate_limiter: DirectRateLimiter,
    api_key: String,
    service_name: String,
}

impl RateLimitClient {
    /// Create a client for the content store described by `config`
    pub fn for_content_store(config: &StoreConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self::new(
            "ContentStore",
            client,
            Self::create_rate_limiter(config.requests_per_second, config.burst_size),
            config.api_key.clone(),
        ))
    }

    /// Create a rate limiter with specified requests per second and burst capacity
    fn create_rate_limiter(requests_per_second: f64, burst_size: u32) -> DirectRateLimiter {
        let period = if requests_per_second > 0.0 {
            Duration::from_secs_f64(1.0 / requests_per_second)
        } else {
            Duration::from_secs(1)
        };

        let burst = NonZeroU32::new(burst_size.max(1)).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
            .allow_burst(burst);

        GovernorRateLimiter::direct(quota)
    }

    /// Create a custom client
    pub fn new(
        service_name: &str,
        client: Client,
        rate_limiter: DirectRateLimiter,
        api_key: String,
    ) -> Self {
        Self {
            client,
            rate_limiter,
            api_key,
            service_name: service_name.to_string(),
        }
    }

    /// GET `url` and decode the JSON body
    pub async fn get_json<T>(&self, url: &str) -> AppResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            log::warn!(
                "{} returned HTTP {}: {}",
                self.service_name,
                status,
                excerpt(&body)
            );
            return Err(AppError::from_status(status, &excerpt(&body)));
        }

        self.parse_response(response).await
    }

    async fn parse_response<T>(&self, response: Response) -> AppResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response_text = response.text().await.map_err(|e| {
            AppError::SerializationError(format!(
                "Failed to read {} response: {}",
                self.service_name, e
            ))
        })?;

        serde_json::from_str(&response_text).map_err(|e| {
            AppError::SerializationError(format!(
                "Failed to parse {} response: {}. Response: {}",
                self.service_name,
                e,
                excerpt(&response_text)
            ))
        })
    }

    /// Check if a request can be made now (for testing/debugging)
    pub fn can_make_request_now(&self) -> bool {
        self.rate_limiter.check().is_ok()
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

fn excerpt(text: &str) -> String {
    if text.chars().count() > ERROR_EXCERPT_CHARS {
        let head: String = text.chars().take(ERROR_EXCERPT_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
