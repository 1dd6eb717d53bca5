use crate::config::{AggregatorConfig, FeedSourceConfig};
use crate::extractor::ContentExtractor;
use crate::fetcher::Fetcher;
use crate::parser::FeedParser;
use crate::relevance::RelevanceFilter;
use crate::traits::ArticleSource;
use crate::types::{Article, ParsedEntry, Result};
use crate::utils;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Pulls the newest entries of every configured RSS/Atom feed.
pub struct FeedFetcher {
    feeds: Vec<FeedSourceConfig>,
    fetcher: Arc<Fetcher>,
    parser: FeedParser,
    extractor: Arc<dyn ContentExtractor>,
    relevance: Arc<RelevanceFilter>,
    max_entries: usize,
    delay_after_feed: Duration,
}

impl FeedFetcher {
    pub fn new(
        config: &AggregatorConfig,
        fetcher: Arc<Fetcher>,
        extractor: Arc<dyn ContentExtractor>,
        relevance: Arc<RelevanceFilter>,
    ) -> Self {
        Self {
            feeds: config.feeds.clone(),
            fetcher,
            parser: FeedParser::new(),
            extractor,
            relevance,
            max_entries: config.limits.max_feed_entries,
            delay_after_feed: config.delays.after_feed(),
        }
    }

    async fn fetch_feed(&self, feed: &FeedSourceConfig) -> Result<Vec<Article>> {
        info!(source = %feed.name, url = %feed.url, "scraping feed");

        let content = self.fetcher.fetch_bytes(&feed.url).await?;
        let parsed = self.parser.parse_feed(&content)?;
        let fetched_at = Utc::now();

        let mut articles = Vec::new();
        for entry in parsed.entries.into_iter().take(self.max_entries) {
            if let Some(article) = self.build_article(feed, entry, fetched_at).await {
                info!(source = %feed.name, title = %article.title, "found relevant article");
                articles.push(article);
            }
        }

        Ok(articles)
    }

    async fn build_article(
        &self,
        feed: &FeedSourceConfig,
        entry: ParsedEntry,
        fetched_at: DateTime<Utc>,
    ) -> Option<Article> {
        if !self.relevance.is_relevant(&entry.title, entry.summary.as_deref()) {
            debug!(source = %feed.name, title = %entry.title, "skipping irrelevant entry");
            return None;
        }

        let link = match entry.link {
            Some(link) if utils::url::is_http_url(&link) => link,
            _ => {
                debug!(source = %feed.name, title = %entry.title, "skipping entry without usable link");
                return None;
            }
        };

        let (published_date, date_estimated) = match entry.published_at.or(entry.updated_at) {
            Some(date) => (date, false),
            None => (fetched_at, true),
        };

        let content = self.extractor.extract(&link).await.or_else(|| entry.summary.clone());

        Some(Article {
            title: entry.title,
            summary: entry.summary,
            content,
            url: link,
            source: feed.name.clone(),
            published_date,
            date_estimated,
            category: feed.category.clone(),
            fetched_at,
        })
    }
}

#[async_trait]
impl ArticleSource for FeedFetcher {
    fn source_kind(&self) -> &'static str {
        "feeds"
    }

    async fn pull(&self) -> Result<Vec<Article>> {
        let mut articles = Vec::new();

        for feed in &self.feeds {
            match self.fetch_feed(feed).await {
                Ok(found) => articles.extend(found),
                Err(e) => error!(source = %feed.name, url = %feed.url, error = %e, "error scraping feed"),
            }

            if !self.delay_after_feed.is_zero() {
                tokio::time::sleep(self.delay_after_feed).await;
            }
        }

        info!(count = articles.len(), feeds = self.feeds.len(), "feed scraping finished");
        Ok(articles)
    }
}
