use crate::types::Article;
use async_trait::async_trait;
use std::collections::BTreeSet;
use tracing::debug;

/// Produces a short natural-language digest of recent articles.
///
/// Implementations receive articles read-only and may return `None`; nothing
/// in the pipeline depends on the result.
#[async_trait]
pub trait Summarizer: Send + Sync {
    fn name(&self) -> String;

    async fn summarize(&self, articles: &[Article]) -> Option<String>;
}

/// Rule-based digest built from headlines, used when no AI service is wired in.
pub struct HeadlineDigest {
    max_headlines: usize,
}

impl HeadlineDigest {
    pub fn new(max_headlines: usize) -> Self {
        Self { max_headlines }
    }
}

impl Default for HeadlineDigest {
    fn default() -> Self {
        Self::new(3)
    }
}

#[async_trait]
impl Summarizer for HeadlineDigest {
    fn name(&self) -> String {
        "headline-digest".to_string()
    }

    async fn summarize(&self, articles: &[Article]) -> Option<String> {
        if articles.is_empty() {
            return None;
        }

        let sources: BTreeSet<&str> = articles.iter().map(|a| a.source.as_str()).collect();
        let mut parts = vec![format!(
            "{} recent {} from {} ({}).",
            articles.len(),
            if articles.len() == 1 { "article" } else { "articles" },
            if sources.len() == 1 { "1 source".to_string() } else { format!("{} sources", sources.len()) },
            sources.into_iter().collect::<Vec<_>>().join(", ")
        )];

        let headlines: Vec<String> = articles
            .iter()
            .take(self.max_headlines)
            .map(|a| format!("\"{}\" ({}, {})", a.title, a.source, a.published_date.format("%Y-%m-%d")))
            .collect();
        parts.push(format!("Latest: {}.", headlines.join("; ")));

        let digest = parts.join(" ");
        debug!(chars = digest.len(), "built headline digest");
        Some(digest)
    }
}
