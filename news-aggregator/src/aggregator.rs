use crate::config::AggregatorConfig;
use crate::extractor::{ContentExtractor, ReadabilityExtractor};
use crate::fetcher::Fetcher;
use crate::relevance::RelevanceFilter;
use crate::sources::{FeedFetcher, SiteFetcher};
use crate::traits::ArticleSource;
use crate::types::{Article, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info};

/// Runs every article source, then merges their output into one
/// deduplicated, newest-first list.
pub struct Aggregator {
    sources: Vec<Arc<dyn ArticleSource>>,
}

impl Aggregator {
    /// Sources are scanned in the given order when deduplicating, so earlier
    /// sources win on a shared `url`.
    pub fn new(sources: Vec<Arc<dyn ArticleSource>>) -> Self {
        Self { sources }
    }

    /// Feed fetcher followed by site fetcher, sharing one HTTP client.
    pub fn from_config(config: &AggregatorConfig) -> Result<Self> {
        let fetcher = Arc::new(Fetcher::new(config.fetch.clone())?);
        let extractor: Arc<dyn ContentExtractor> = Arc::new(ReadabilityExtractor::new(fetcher.clone()));
        let relevance = Arc::new(RelevanceFilter::new(&config.relevance.keywords));

        let feeds = FeedFetcher::new(config, fetcher.clone(), extractor.clone(), relevance.clone());
        let sites = SiteFetcher::new(config, fetcher, extractor, relevance);

        Ok(Self::new(vec![Arc::new(feeds), Arc::new(sites)]))
    }

    /// Never fails: a source that errors out contributes nothing.
    pub async fn aggregate(&self) -> Vec<Article> {
        let results = futures::future::join_all(self.sources.iter().map(|source| source.pull())).await;

        let mut all_articles = Vec::new();
        for (source, result) in self.sources.iter().zip(results) {
            match result {
                Ok(articles) => {
                    info!(kind = source.source_kind(), count = articles.len(), "source finished");
                    all_articles.extend(articles);
                }
                Err(e) => error!(kind = source.source_kind(), error = %e, "source failed"),
            }
        }

        let unique = dedupe_and_sort(all_articles);
        info!(count = unique.len(), "aggregation completed");
        unique
    }
}

/// Keep the first article seen for each `url`, then sort newest first.
/// Ties keep scan order.
pub fn dedupe_and_sort(articles: Vec<Article>) -> Vec<Article> {
    let mut seen_urls = HashSet::new();
    let mut unique: Vec<Article> = articles
        .into_iter()
        .filter(|article| seen_urls.insert(article.url.clone()))
        .collect();

    unique.sort_by(|a, b| b.published_date.cmp(&a.published_date));
    unique
}
