use crate::types::{AggregatorError, FetchConfig, Result};
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use reqwest::{Client, Response, StatusCode};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

/// Shared HTTP client with per-host politeness and retry on transient errors.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
    /// Earliest instant the next request to each host may start.
    next_allowed: Mutex<HashMap<String, Instant>>,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            config,
            next_allowed: Mutex::new(HashMap::new()),
        })
    }

    /// GET `url` as text, decoded with the charset the response declares in
    /// its `Content-Type` (UTF-8 when none is given).
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();
        let response = self.send(url).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let text = response.text().await?;
        info!(
            %url,
            chars = text.chars().count(),
            content_type = content_type.as_deref().unwrap_or("-"),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "fetched"
        );
        Ok(text)
    }

    /// GET `url` as raw bytes. Used for feeds, whose XML prolog carries
    /// the encoding.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let start_time = Instant::now();
        let bytes = self.send(url).await?.bytes().await?;
        info!(
            %url,
            bytes = bytes.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "fetched"
        );
        Ok(bytes.to_vec())
    }

    /// Wait until a request to `url`'s host is allowed, reserving the slot.
    /// Waiting on one host never delays requests to another.
    pub async fn throttle(&self, url: &str) -> Result<()> {
        let min_interval = Duration::from_millis(self.config.min_host_interval_ms);
        if min_interval.is_zero() {
            return Ok(());
        }

        let parsed_url = Url::parse(url)?;
        let host = parsed_url.host_str().unwrap_or("").to_string();

        let wait_time = {
            let mut next_allowed = self.next_allowed.lock().await;
            let now = Instant::now();
            let slot = next_allowed
                .get(&host)
                .copied()
                .filter(|at| *at > now)
                .unwrap_or(now);
            next_allowed.insert(host.clone(), slot + min_interval);
            slot - now
        };

        if !wait_time.is_zero() {
            debug!(%host, ?wait_time, "rate limiting");
            tokio::time::sleep(wait_time).await;
        }
        Ok(())
    }

    /// Send a GET, retrying network errors, 5xx and 429 with exponential
    /// backoff. Other non-success statuses fail immediately.
    async fn send(&self, url: &str) -> Result<Response> {
        debug!(%url, "fetching");
        self.throttle(url).await?;

        let retry_delay = Duration::from_secs(self.config.retry_delay_seconds);
        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: retry_delay,
            initial_interval: retry_delay,
            max_interval: retry_delay * 32,
            multiplier: 2.0,
            max_elapsed_time: Some(retry_delay * 60),
            ..Default::default()
        };

        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        self.check_size(url, response.content_length())?;
                        return Ok(response);
                    }

                    let error = AggregatorError::HttpStatus {
                        url: url.to_string(),
                        status: status.as_u16(),
                    };
                    if !(status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS) {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
                Err(e) => {
                    last_error = Some(AggregatorError::Http(e));
                }
            }

            if attempt < self.config.max_retries {
                if let Some(delay) = backoff.next_backoff() {
                    warn!(%url, attempt = attempt + 1, ?delay, "fetch failed, retrying");
                    tokio::time::sleep(delay).await;
                    continue;
                }
            }
            break;
        }

        Err(last_error.unwrap_or_else(|| AggregatorError::General(format!("fetch of {} failed", url))))
    }

    fn check_size(&self, url: &str, content_length: Option<u64>) -> Result<()> {
        if let Some(content_length) = content_length {
            let size_mb = content_length as usize / (1024 * 1024);
            if size_mb > self.config.max_body_size_mb {
                return Err(AggregatorError::BodyTooLarge {
                    url: url.to_string(),
                    size_mb,
                });
            }
        }
        Ok(())
    }
}
