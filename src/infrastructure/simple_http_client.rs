//! HTTP client for crawling router-switch.com
//!
//! Wraps a reqwest client with a token bucket rate limiter and a retry
//! policy: exponential backoff with jitter, `Retry-After` on 429/503, and no
//! retries for pages that are gone (404/410).

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client, ClientBuilder, StatusCode, header};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::services::{FetchError, FetchedPage, PageFetcher};
use crate::infrastructure::config::HttpConfig;

/// Configuration for HTTP client behavior
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Maximum requests per second; 0 disables the limiter
    pub max_requests_per_second: u32,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Attempts per URL, including the first
    pub max_retries: u32,
    /// Backoff base in milliseconds
    pub retry_base_delay_ms: u64,
    /// User agent string
    pub user_agent: String,
    /// Whether to follow redirects
    pub follow_redirects: bool,
}

impl HttpClientConfig {
    pub fn from_http_config(http: &HttpConfig) -> Self {
        Self {
            max_requests_per_second: http.requests_per_second,
            timeout_seconds: http.request_timeout_secs,
            max_retries: http.max_retries.max(1),
            retry_base_delay_ms: http.retry_base_delay_ms,
            user_agent: http.user_agent.clone(),
            follow_redirects: http.follow_redirects,
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from_http_config(&HttpConfig::default())
    }
}

/// HTTP client with built-in rate limiting and retries
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl HttpClient {
    pub fn from_http_config(http: &HttpConfig) -> Result<Self, reqwest::Error> {
        Self::with_config(HttpClientConfig::from_http_config(http))
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self, reqwest::Error> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()?;

        let rate_limiter = NonZeroU32::new(config.max_requests_per_second)
            .map(|rps| Arc::new(RateLimiter::direct(Quota::per_second(rps))));
        if rate_limiter.is_none() {
            debug!("🔓 No rate limiting applied (max_requests_per_second = 0)");
        }

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    fn validate_url(url: &str) -> Result<(), FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(FetchError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme '{other}'"),
            }),
        }
    }

    /// Pages that will not come back on a retry
    fn is_permanent(status: StatusCode) -> bool {
        matches!(status, StatusCode::NOT_FOUND | StatusCode::GONE)
    }

    /// Backoff before the next attempt: base * 2^(attempt-1) plus up to half the base of jitter
    pub(crate) fn backoff_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let base = self.config.retry_base_delay_ms;
        let exponential = base.saturating_mul(2_u64.saturating_pow(attempt.saturating_sub(1)));
        let jitter = fastrand::u64(0..=base / 2);
        let delay = Duration::from_millis(exponential.saturating_add(jitter));
        retry_after.map_or(delay, |server_delay| server_delay.max(delay))
    }

    fn retry_after(response: &reqwest::Response) -> Option<Duration> {
        if !matches!(
            response.status(),
            StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE
        ) {
            return None;
        }
        response
            .headers()
            .get(header::RETRY_AFTER)?
            .to_str()
            .ok()?
            .trim()
            .parse::<u64>()
            .ok()
            .map(Duration::from_secs)
    }

    /// Fetch a page body with rate limiting and the retry policy
    pub async fn fetch_with_policy(&self, url: &str) -> Result<FetchedPage, FetchError> {
        Self::validate_url(url)?;

        let max_attempts = self.config.max_retries.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            if let Some(limiter) = &self.rate_limiter {
                limiter.until_ready().await;
            }

            debug!("🌐 HTTP GET (attempt {}/{}) : {}", attempt, max_attempts, url);
            let (error, retry_after) = match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let final_url = response.url().to_string();
                        match response.text().await {
                            Ok(body) => {
                                if attempt > 1 {
                                    info!("✅ Fetched {} after {} attempts", url, attempt);
                                }
                                return Ok(FetchedPage {
                                    url: url.to_string(),
                                    final_url,
                                    status: status.as_u16(),
                                    body,
                                    attempts: attempt,
                                });
                            }
                            Err(e) => (
                                FetchError::Transport {
                                    url: url.to_string(),
                                    message: format!("failed to read body: {e}"),
                                    attempts: attempt,
                                },
                                None,
                            ),
                        }
                    } else {
                        let error = FetchError::Status {
                            url: url.to_string(),
                            status: status.as_u16(),
                            attempts: attempt,
                        };
                        if Self::is_permanent(status) {
                            warn!("❌ HTTP {} for {}, not retrying", status, url);
                            return Err(error);
                        }
                        (error, Self::retry_after(&response))
                    }
                }
                Err(e) => (
                    FetchError::Transport {
                        url: url.to_string(),
                        message: e.to_string(),
                        attempts: attempt,
                    },
                    None,
                ),
            };

            warn!("Attempt {}/{} failed for {}: {}", attempt, max_attempts, url, error);
            last_error = Some(error);

            if attempt < max_attempts {
                let delay = self.backoff_delay(attempt, retry_after);
                debug!("Retrying {} in {:?}", url, delay);
                sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| FetchError::Transport {
            url: url.to_string(),
            message: "no attempt was made".to_string(),
            attempts: 0,
        }))
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.fetch_with_policy(url).await
    }
}
