#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use news_aggregator::{AggregatorError, AggregatorConfig, Article, ContentExtractor, FetchConfig, Result};
use news_aggregator::config::DelayConfig;
use std::collections::HashMap;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
}

/// An article published `offset_minutes` after the base time.
pub fn article(url: &str, offset_minutes: i64) -> Article {
    article_from(url, "Test Source", offset_minutes)
}

pub fn article_from(url: &str, source: &str, offset_minutes: i64) -> Article {
    Article {
        title: format!("Comfort women article {}", url),
        summary: Some(format!("Summary of {}", url)),
        content: Some(format!("Content of {}", url)),
        url: url.to_string(),
        source: source.to_string(),
        published_date: base_time() + Duration::minutes(offset_minutes),
        date_estimated: false,
        category: Some("News".to_string()),
        fetched_at: base_time(),
    }
}

/// Fast, single-attempt HTTP settings for local mock servers.
pub fn test_fetch_config() -> FetchConfig {
    FetchConfig {
        user_agent: "News-Aggregator-Test/1.0".to_string(),
        timeout_seconds: 5,
        max_retries: 0,
        retry_delay_seconds: 0,
        max_body_size_mb: 10,
        max_redirects: 5,
        min_host_interval_ms: 0,
    }
}

pub fn test_config() -> AggregatorConfig {
    AggregatorConfig {
        fetch: test_fetch_config(),
        feeds: Vec::new(),
        sites: Vec::new(),
        delays: DelayConfig::none(),
        ..AggregatorConfig::default()
    }
}

/// Extractor answering from a fixed url → text table.
#[derive(Default)]
pub struct MapExtractor {
    pages: HashMap<String, String>,
}

impl MapExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, text: impl Into<String>) -> Self {
        self.pages.insert(url.into(), text.into());
        self
    }
}

#[async_trait]
impl ContentExtractor for MapExtractor {
    async fn try_extract(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| AggregatorError::Extraction(format!("{}: not found", url)))
    }
}
