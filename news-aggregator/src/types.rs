use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// A normalized news article. Produced once by a fetcher and never mutated
/// afterwards; the store only ever copies it in or drops it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    /// Deduplication key and permanent external reference.
    pub url: String,
    pub source: String,
    pub published_date: DateTime<Utc>,
    /// True when `published_date` is the fetch time rather than a date
    /// reported by the source.
    #[serde(default)]
    pub date_estimated: bool,
    pub category: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl Article {
    /// Case-insensitive substring match over title, summary and content.
    /// `needle` must already be lowercase.
    pub fn mentions(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.summary.as_deref().unwrap_or("").to_lowercase().contains(needle)
            || self.content.as_deref().unwrap_or("").to_lowercase().contains(needle)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
    pub max_body_size_mb: usize,
    pub max_redirects: usize,
    /// Minimum spacing between two requests to the same host.
    pub min_host_interval_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (compatible; News-Aggregator/1.0)".to_string(),
            timeout_seconds: 30,
            max_retries: 2,
            retry_delay_seconds: 2,
            max_body_size_mb: 10,
            max_redirects: 5,
            min_host_interval_ms: 1000,
        }
    }
}

#[derive(Debug)]
pub struct ParsedFeed {
    pub entries: Vec<ParsedEntry>,
}

#[derive(Debug)]
pub struct ParsedEntry {
    pub link: Option<String>,
    pub title: String,
    pub summary: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Outcome of one fetch → aggregate → merge cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle_id: Uuid,
    pub success: bool,
    pub added_count: usize,
    pub total_count: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_articles: usize,
    pub count_by_category: BTreeMap<String, usize>,
    pub count_by_source: BTreeMap<String, usize>,
    pub last_update: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticlePage {
    pub articles: Vec<Article>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub sources: Vec<String>,
}

/// Immutable view of the stored collection, newest first.
pub type ArticleSnapshot = Arc<Vec<Article>>;

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Response from {url} exceeds limit: {size_mb}MB")]
    BodyTooLarge { url: String, size_mb: usize },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
