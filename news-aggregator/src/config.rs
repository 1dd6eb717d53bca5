use crate::types::{FetchConfig, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Placeholder replaced by the encoded search term in a site's search URL.
pub const QUERY_PLACEHOLDER: &str = "{query}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSourceConfig {
    pub name: String,
    pub url: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSourceConfig {
    pub name: String,
    pub base_url: String,
    /// Search endpoint, e.g. `https://example.com/search?q={query}`.
    pub search_url_template: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelevanceConfig {
    pub keywords: Vec<String>,
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            keywords: [
                "comfort women",
                "comfort woman",
                "위안부",
                "wianbu",
                "japanese military",
                "imperial japan",
                "wartime sexual slavery",
                "sex slaves",
                "sexual slavery",
                "world war ii korea",
                "forced prostitution",
                "military brothel",
                "ianfu",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_feed_entries: usize,
    pub max_links_per_term: usize,
    pub summary_chars: usize,
    pub store_capacity: usize,
    pub digest_articles: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_feed_entries: 10,
            max_links_per_term: 5,
            summary_chars: 300,
            store_capacity: 200,
            digest_articles: 5,
        }
    }
}

/// Politeness pauses between network calls, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    pub after_feed_ms: u64,
    pub after_extraction_ms: u64,
    pub after_search_ms: u64,
}

impl DelayConfig {
    pub fn none() -> Self {
        Self {
            after_feed_ms: 0,
            after_extraction_ms: 0,
            after_search_ms: 0,
        }
    }

    pub fn after_feed(&self) -> Duration {
        Duration::from_millis(self.after_feed_ms)
    }

    pub fn after_extraction(&self) -> Duration {
        Duration::from_millis(self.after_extraction_ms)
    }

    pub fn after_search(&self) -> Duration {
        Duration::from_millis(self.after_search_ms)
    }
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            after_feed_ms: 2000,
            after_extraction_ms: 1000,
            after_search_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub interval_hours: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { interval_hours: 6 }
    }
}

/// Top-level configuration, deserialized from TOML. Every section falls back
/// to its default when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    pub fetch: FetchConfig,
    pub relevance: RelevanceConfig,
    pub search_terms: Vec<String>,
    pub feeds: Vec<FeedSourceConfig>,
    pub sites: Vec<SiteSourceConfig>,
    pub limits: LimitsConfig,
    pub delays: DelayConfig,
    pub schedule: ScheduleConfig,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            relevance: RelevanceConfig::default(),
            search_terms: vec![
                "comfort women".to_string(),
                "위안부".to_string(),
                "wartime sexual slavery".to_string(),
            ],
            feeds: default_feeds(),
            sites: default_sites(),
            limits: LimitsConfig::default(),
            delays: DelayConfig::default(),
            schedule: ScheduleConfig::default(),
        }
    }
}

impl AggregatorConfig {
    pub fn from_toml_str(data: &str) -> Result<Self> {
        let config: AggregatorConfig = toml::from_str(data)?;
        debug!(
            feeds = config.feeds.len(),
            sites = config.sites.len(),
            keywords = config.relevance.keywords.len(),
            "parsed configuration"
        );
        Ok(config)
    }

    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_toml_str(&data)
    }
}

fn feed(name: &str, url: &str, category: &str) -> FeedSourceConfig {
    FeedSourceConfig {
        name: name.to_string(),
        url: url.to_string(),
        category: Some(category.to_string()),
    }
}

fn site(name: &str, base_url: &str, search_url_template: &str, category: &str) -> SiteSourceConfig {
    SiteSourceConfig {
        name: name.to_string(),
        base_url: base_url.to_string(),
        search_url_template: search_url_template.to_string(),
        category: Some(category.to_string()),
    }
}

fn default_feeds() -> Vec<FeedSourceConfig> {
    vec![
        feed("연합뉴스", "https://www.yna.co.kr/rss/politics.xml", "Politics"),
        feed("한겨레", "http://www.hani.co.kr/rss/", "News"),
        feed("경향신문", "http://www.khan.co.kr/rss/rssdata/total_news.xml", "News"),
        feed("중앙일보", "https://rss.joins.com/joins_news_list.xml", "News"),
        feed("KBS News", "http://world.kbs.co.kr/rss/rss_news.htm?lang=k", "Broadcasting"),
    ]
}

fn default_sites() -> Vec<SiteSourceConfig> {
    vec![
        site(
            "조선일보",
            "https://www.chosun.com",
            "https://www.chosun.com/nsearch/?q={query}",
            "News",
        ),
        site(
            "동아일보",
            "https://www.donga.com",
            "https://www.donga.com/news/search?q={query}",
            "News",
        ),
        site(
            "SBS News",
            "https://news.sbs.co.kr",
            "https://news.sbs.co.kr/news/search/main.do?q={query}",
            "Broadcasting",
        ),
    ]
}
