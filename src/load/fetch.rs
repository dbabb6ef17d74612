//! Network fetching for [`crate::CompositionSpec::Url`].
//!
//! The loader talks to the network only through [`NetworkFetcher`], so callers can swap in a
//! fetcher with their own headers, retry policy or HTTP cache.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::foundation::error::{LottieError, LottieResult};

/// Body and metadata of a successful fetch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchedBody {
    /// Raw response bytes.
    pub bytes: Vec<u8>,
    /// `Content-Type` header, when present.
    pub content_type: Option<String>,
}

/// Capability used to download remote compositions.
#[async_trait]
pub trait NetworkFetcher: Send + Sync {
    /// Download `url`, returning the body or a classified failure.
    async fn fetch(&self, url: &Url) -> LottieResult<FetchedBody>;
}

/// Settings for the default [`ReqwestFetcher`].
#[derive(Clone, Debug)]
pub struct FetchConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum retry attempts for transient errors (default: 3).
    pub max_retries: u8,
    /// Base delay in milliseconds for exponential backoff (default: 500).
    pub retry_base_delay_ms: u64,
    /// Extra headers sent with every request.
    pub headers: Vec<(String, String)>,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay_ms: 500,
            headers: Vec::new(),
            user_agent: concat!("lottie-loader/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchConfig {
    /// Backoff before retry `attempt` (1-based).
    pub fn retry_delay(&self, attempt: u8) -> Duration {
        let exp = u32::from(attempt.saturating_sub(1)).min(16);
        Duration::from_millis(self.retry_base_delay_ms.saturating_mul(1u64 << exp))
    }
}

/// Default HTTP fetcher backed by `reqwest`, with exponential backoff for transient errors.
pub struct ReqwestFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl ReqwestFetcher {
    /// Build a fetcher from `config`.
    pub fn new(config: FetchConfig) -> LottieResult<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        for (name, value) in &config.headers {
            let name = reqwest::header::HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| LottieError::validation(format!("invalid header name '{name}': {e}")))?;
            let value = reqwest::header::HeaderValue::from_str(value).map_err(|e| {
                LottieError::validation(format!("invalid value for header '{name}': {e}"))
            })?;
            headers.append(name, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| LottieError::network(format!("build http client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Settings this fetcher was built with.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    async fn fetch_once(&self, url: &Url) -> LottieResult<FetchedBody> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| LottieError::network(format!("GET {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LottieError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| LottieError::network(format!("read body of {url}: {e}")))?;

        Ok(FetchedBody {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

#[async_trait]
impl NetworkFetcher for ReqwestFetcher {
    #[tracing::instrument(skip_all, fields(url = %url))]
    async fn fetch(&self, url: &Url) -> LottieResult<FetchedBody> {
        retry_transient(&self.config, || self.fetch_once(url)).await
    }
}

/// Run `attempt` until it succeeds, fails permanently, or `config.max_retries` is exhausted.
pub(crate) async fn retry_transient<F, Fut, T>(config: &FetchConfig, mut attempt: F) -> LottieResult<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = LottieResult<T>>,
{
    let mut tries: u8 = 0;
    loop {
        match attempt().await {
            Ok(v) => return Ok(v),
            Err(e) if e.is_transient() && tries < config.max_retries => {
                tries += 1;
                let delay = config.retry_delay(tries);
                tracing::debug!(error = %e, attempt = tries, ?delay, "transient fetch failure, retrying");
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}


#[cfg(test)]
#[path = "../../tests/unit/load/fetch.rs"]
mod tests;
