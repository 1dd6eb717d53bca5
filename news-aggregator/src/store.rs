use crate::types::{Article, ArticlePage, ArticleSnapshot, FilterOptions, StoreStats};
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

pub const DEFAULT_CAPACITY: usize = 200;
pub const DEFAULT_PER_PAGE: usize = 10;

struct StoreState {
    articles: ArticleSnapshot,
    last_update: Option<DateTime<Utc>>,
}

/// Bounded, deduplicating, newest-first article collection.
///
/// `merge` is the only mutator. It builds a new vector and swaps it in under
/// the write guard, so readers always hold a complete snapshot.
pub struct ArticleStore {
    capacity: usize,
    state: RwLock<StoreState>,
}

impl ArticleStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: RwLock::new(StoreState {
                articles: Arc::new(Vec::new()),
                last_update: None,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert articles whose `url` is not stored yet, re-sort by
    /// `published_date` descending and evict the oldest beyond capacity.
    /// Returns how many articles were appended.
    pub async fn merge(&self, incoming: Vec<Article>) -> usize {
        let mut state = self.state.write().await;

        if incoming.is_empty() {
            state.last_update = Some(Utc::now());
            return 0;
        }

        let mut articles: Vec<Article> = state.articles.as_ref().clone();
        let mut known_urls: HashSet<String> = articles.iter().map(|a| a.url.clone()).collect();

        let mut added_count = 0;
        for article in incoming {
            if !known_urls.insert(article.url.clone()) {
                debug!(url = %article.url, "skipping stored article");
                continue;
            }
            articles.push(article);
            added_count += 1;
        }

        // Stable, so equal dates keep insertion order.
        articles.sort_by(|a, b| b.published_date.cmp(&a.published_date));
        if articles.len() > self.capacity {
            let evicted = articles.len() - self.capacity;
            articles.truncate(self.capacity);
            debug!(evicted, capacity = self.capacity, "evicted oldest articles");
        }

        state.articles = Arc::new(articles);
        state.last_update = Some(Utc::now());

        info!(added = added_count, total = state.articles.len(), "merged articles into store");
        added_count
    }

    pub async fn snapshot(&self) -> ArticleSnapshot {
        self.state.read().await.articles.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.articles.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn last_update(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.last_update
    }

    pub async fn list(&self, offset: usize, limit: usize) -> Vec<Article> {
        let articles = self.snapshot().await;
        articles.iter().skip(offset).take(limit).cloned().collect()
    }

    /// 1-based page view; page 0 is treated as page 1 and a zero
    /// `per_page` as [`DEFAULT_PER_PAGE`].
    pub async fn page(&self, page: usize, per_page: usize) -> ArticlePage {
        let articles = self.snapshot().await;
        paginate(&articles, page, per_page)
    }

    pub async fn get(&self, url: &str) -> Option<Article> {
        let articles = self.snapshot().await;
        articles.iter().find(|a| a.url == url).cloned()
    }

    /// Case-insensitive search. `query` matches title, summary or content;
    /// `category` and `source` must match exactly (ignoring case). Empty
    /// values do not filter.
    pub async fn search(&self, query: &str, category: Option<&str>, source: Option<&str>) -> Vec<Article> {
        let articles = self.snapshot().await;

        let query = query.trim().to_lowercase();
        let category = category.map(|c| c.trim().to_lowercase()).filter(|c| !c.is_empty());
        let source = source.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());

        articles
            .iter()
            .filter(|a| query.is_empty() || a.mentions(&query))
            .filter(|a| {
                category.as_ref().map_or(true, |c| {
                    a.category.as_deref().is_some_and(|ac| ac.to_lowercase() == *c)
                })
            })
            .filter(|a| source.as_ref().map_or(true, |s| a.source.to_lowercase() == *s))
            .cloned()
            .collect()
    }

    /// Distinct categories and sources present, sorted, for filter menus.
    pub async fn filter_options(&self) -> FilterOptions {
        let articles = self.snapshot().await;

        let categories: BTreeSet<String> = articles
            .iter()
            .filter_map(|a| a.category.clone())
            .filter(|c| !c.is_empty())
            .collect();
        let sources: BTreeSet<String> = articles
            .iter()
            .map(|a| a.source.clone())
            .filter(|s| !s.is_empty())
            .collect();

        FilterOptions {
            categories: categories.into_iter().collect(),
            sources: sources.into_iter().collect(),
        }
    }

    pub async fn stats(&self) -> StoreStats {
        let state = self.state.read().await;

        let mut stats = StoreStats {
            total_articles: state.articles.len(),
            last_update: state.last_update,
            ..Default::default()
        };

        for article in state.articles.iter() {
            let category = article
                .category
                .as_deref()
                .filter(|c| !c.is_empty())
                .unwrap_or("Uncategorized");
            let source = if article.source.is_empty() { "Unknown" } else { &article.source };

            *stats.count_by_category.entry(category.to_string()).or_insert(0) += 1;
            *stats.count_by_source.entry(source.to_string()).or_insert(0) += 1;
        }

        stats
    }
}

impl Default for ArticleStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

pub fn paginate(articles: &[Article], page: usize, per_page: usize) -> ArticlePage {
    let page = page.max(1);
    let per_page = if per_page == 0 { DEFAULT_PER_PAGE } else { per_page };
    let start = (page - 1).saturating_mul(per_page);
    let end = start.saturating_add(per_page);

    ArticlePage {
        articles: articles.iter().skip(start).take(per_page).cloned().collect(),
        page,
        per_page,
        total: articles.len(),
        has_prev: page > 1,
        has_next: end < articles.len(),
    }
}
