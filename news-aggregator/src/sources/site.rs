use crate::config::{AggregatorConfig, SiteSourceConfig};
use crate::extractor::ContentExtractor;
use crate::fetcher::Fetcher;
use crate::relevance::RelevanceFilter;
use crate::traits::ArticleSource;
use crate::types::{AggregatorError, Article, Result};
use crate::utils::{text, url as url_utils};
use async_trait::async_trait;
use chrono::Utc;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

/// An anchor from a search results page that looked on topic.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateLink {
    pub url: String,
    pub text: String,
}

/// Searches configured news sites for each search term and scrapes the
/// matching result links.
pub struct SiteFetcher {
    sites: Vec<SiteSourceConfig>,
    search_terms: Vec<String>,
    fetcher: Arc<Fetcher>,
    extractor: Arc<dyn ContentExtractor>,
    relevance: Arc<RelevanceFilter>,
    max_links_per_term: usize,
    summary_chars: usize,
    delay_after_extraction: Duration,
    delay_after_search: Duration,
}

impl SiteFetcher {
    pub fn new(
        config: &AggregatorConfig,
        fetcher: Arc<Fetcher>,
        extractor: Arc<dyn ContentExtractor>,
        relevance: Arc<RelevanceFilter>,
    ) -> Self {
        Self {
            sites: config.sites.clone(),
            search_terms: config.search_terms.clone(),
            fetcher,
            extractor,
            relevance,
            max_links_per_term: config.limits.max_links_per_term,
            summary_chars: config.limits.summary_chars,
            delay_after_extraction: config.delays.after_extraction(),
            delay_after_search: config.delays.after_search(),
        }
    }

    async fn scrape_site(&self, site: &SiteSourceConfig, articles: &mut Vec<Article>) -> Result<()> {
        info!(source = %site.name, "scraping website");
        let base_url = Url::parse(&site.base_url)?;

        for term in &self.search_terms {
            if let Err(e) = self.search_term(site, &base_url, term, articles).await {
                warn!(source = %site.name, %term, error = %e, "error searching site");
            }
            pause(self.delay_after_search).await;
        }

        Ok(())
    }

    async fn search_term(
        &self,
        site: &SiteSourceConfig,
        base_url: &Url,
        term: &str,
        articles: &mut Vec<Article>,
    ) -> Result<()> {
        let search_url = url_utils::build_search_url(&site.search_url_template, term);
        let html = self.fetcher.fetch_text(&search_url).await?;

        let known_urls: HashSet<String> = articles.iter().map(|a| a.url.clone()).collect();
        let candidates = extract_candidate_links(
            &html,
            base_url,
            &self.relevance,
            &known_urls,
            self.max_links_per_term,
        )?;
        debug!(source = %site.name, %term, candidates = candidates.len(), "collected candidate links");

        for candidate in candidates {
            match self.extractor.extract(&candidate.url).await {
                Some(content) if self.relevance.is_relevant(&candidate.text, Some(content.as_str())) => {
                    info!(source = %site.name, title = %candidate.text, "found article");
                    articles.push(self.build_article(site, candidate, content));
                }
                Some(_) => debug!(url = %candidate.url, "extracted text not relevant"),
                None => debug!(url = %candidate.url, "no content extracted"),
            }
            pause(self.delay_after_extraction).await;
        }

        Ok(())
    }

    fn build_article(&self, site: &SiteSourceConfig, candidate: CandidateLink, content: String) -> Article {
        let now = Utc::now();
        Article {
            summary: Some(text::truncate_with_ellipsis(&content, self.summary_chars)),
            title: candidate.text,
            content: Some(content),
            url: candidate.url,
            source: site.name.clone(),
            // Search pages carry no reliable date.
            published_date: now,
            date_estimated: true,
            category: site.category.clone(),
            fetched_at: now,
        }
    }
}

#[async_trait]
impl ArticleSource for SiteFetcher {
    fn source_kind(&self) -> &'static str {
        "sites"
    }

    async fn pull(&self) -> Result<Vec<Article>> {
        let mut articles = Vec::new();

        for site in &self.sites {
            if let Err(e) = self.scrape_site(site, &mut articles).await {
                error!(source = %site.name, error = %e, "error scraping website");
            }
        }

        info!(count = articles.len(), sites = self.sites.len(), "website scraping finished");
        Ok(articles)
    }
}

/// Collect anchors whose visible text is on topic, resolved against
/// `base_url`. URLs in `known_urls` and repeats within the page are skipped;
/// at most `limit` links are returned, in document order.
pub fn extract_candidate_links(
    html: &str,
    base_url: &Url,
    relevance: &RelevanceFilter,
    known_urls: &HashSet<String>,
    limit: usize,
) -> Result<Vec<CandidateLink>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").map_err(|e| AggregatorError::Selector(e.to_string()))?;

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for element in document.select(&selector) {
        if candidates.len() >= limit {
            break;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let link_text = text::collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "));
        if href.trim().is_empty() || link_text.is_empty() {
            continue;
        }
        if !relevance.is_relevant(&link_text, None) {
            continue;
        }

        let Some(resolved) = url_utils::resolve(base_url, href) else {
            continue;
        };
        if known_urls.contains(&resolved) || !seen.insert(resolved.clone()) {
            continue;
        }

        candidates.push(CandidateLink {
            url: resolved,
            text: link_text,
        });
    }

    Ok(candidates)
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
