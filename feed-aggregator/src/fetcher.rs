use crate::traits::FeedFetcher;
use crate::types::{AggregatorError, FetchConfig, Result, SourceDescriptor};
use async_trait::async_trait;
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use url::Url;

/// HTTP fetcher backed by reqwest, with exponential backoff between retries.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let redirect = if config.follow_redirects {
            reqwest::redirect::Policy::limited(config.max_redirects)
        } else {
            reqwest::redirect::Policy::none()
        };

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(redirect)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn backoff(&self) -> ExponentialBackoff<backoff::SystemClock> {
        ExponentialBackoff {
            current_interval: Duration::from_secs(self.config.retry_delay_seconds),
            initial_interval: Duration::from_secs(self.config.retry_delay_seconds),
            max_interval: Duration::from_secs(self.config.retry_delay_seconds * 8),
            multiplier: 2.0,
            max_elapsed_time: Some(Duration::from_secs(self.config.timeout_seconds * 2)),
            ..Default::default()
        }
    }

    async fn fetch_url(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();
        let mut backoff = self.backoff();
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();

                    if !status.is_success() {
                        let err = AggregatorError::Status {
                            status: status.as_u16(),
                            url: url.to_string(),
                        };
                        if !is_retryable(status) {
                            return Err(err);
                        }
                        last_error = Some(err);
                    } else {
                        if let Some(content_length) = response.content_length() {
                            self.check_size(content_length as usize)?;
                        }

                        let body = response.text().await?;
                        self.check_size(body.len())?;
                        ensure_xml(&body, url)?;

                        info!(
                            "Fetched feed: {} ({} bytes in {}ms)",
                            url,
                            body.len(),
                            start_time.elapsed().as_millis()
                        );
                        return Ok(body);
                    }
                }
                Err(e) => {
                    last_error = Some(AggregatorError::Http(e));
                }
            }

            if attempt < self.config.max_retries {
                if let Some(delay) = backoff.next_backoff() {
                    warn!("Attempt {} failed for {}, retrying in {:?}", attempt + 1, url, delay);
                    tokio::time::sleep(delay).await;
                    continue;
                }
            }
            break;
        }

        error!("Failed to fetch feed after {} attempts: {}", self.config.max_retries + 1, url);
        Err(last_error.unwrap_or_else(|| AggregatorError::General(format!("no response from {}", url))))
    }

    fn check_size(&self, bytes: usize) -> Result<()> {
        let limit = self.config.max_feed_size_mb * 1024 * 1024;
        if bytes > limit {
            return Err(AggregatorError::FeedTooLarge {
                size_mb: bytes / (1024 * 1024),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl FeedFetcher for Fetcher {
    fn fetcher_name(&self) -> String {
        "http".to_string()
    }

    async fn fetch(&self, source: &SourceDescriptor) -> Result<String> {
        let url = request_url(&source.feed_url, self.config.proxy_prefix.as_deref())?;
        debug!("Fetching {} from {}", source.name, url);
        self.fetch_url(&url).await
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// The URL actually requested for a feed, routed through the proxy prefix
/// when one is configured.
pub fn request_url(feed_url: &str, proxy_prefix: Option<&str>) -> Result<String> {
    let feed_url = feed_url.trim();
    Url::parse(feed_url)?;
    match proxy_prefix {
        Some(prefix) if !prefix.is_empty() => {
            let encoded: String = url::form_urlencoded::byte_serialize(feed_url.as_bytes()).collect();
            Ok(format!("{}{}", prefix, encoded))
        }
        _ => Ok(feed_url.to_string()),
    }
}

/// Rejects bodies that cannot be a feed document, such as HTML error pages
/// or JSON.
pub fn ensure_xml(body: &str, url: &str) -> Result<()> {
    let head = body.trim_start_matches('\u{feff}').trim_start();
    let lowered: String = head.chars().take(64).collect::<String>().to_lowercase();
    if !head.starts_with('<') || lowered.starts_with("<!doctype html") || lowered.starts_with("<html") {
        return Err(AggregatorError::NotXml { url: url.to_string() });
    }
    Ok(())
}

#[derive(Debug, Clone)]
enum StaticResponse {
    Body(String),
    Status(u16),
}

/// In-memory fetcher keyed by feed URL, for tests and offline runs.
/// Unknown URLs answer 404.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    responses: HashMap<String, StaticResponse>,
    delays: HashMap<String, Duration>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, feed_url: &str, body: &str) -> Self {
        self.responses
            .insert(feed_url.to_string(), StaticResponse::Body(body.to_string()));
        self
    }

    pub fn with_status(mut self, feed_url: &str, status: u16) -> Self {
        self.responses
            .insert(feed_url.to_string(), StaticResponse::Status(status));
        self
    }

    pub fn with_delay(mut self, feed_url: &str, delay: Duration) -> Self {
        self.delays.insert(feed_url.to_string(), delay);
        self
    }
}

#[async_trait]
impl FeedFetcher for StaticFetcher {
    fn fetcher_name(&self) -> String {
        "static".to_string()
    }

    async fn fetch(&self, source: &SourceDescriptor) -> Result<String> {
        let url = source.feed_url.trim();
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }

        match self.responses.get(url) {
            Some(StaticResponse::Body(body)) => {
                ensure_xml(body, url)?;
                Ok(body.clone())
            }
            Some(StaticResponse::Status(status)) => Err(AggregatorError::Status {
                status: *status,
                url: url.to_string(),
            }),
            None => Err(AggregatorError::Status {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}
