use crate::fetcher::Fetcher;
use crate::types::{AggregatorError, Result};
use async_trait::async_trait;
use std::io::Cursor;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Best-effort main-body text extraction for a web page.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Fetch and extract, reporting why nothing usable came back.
    async fn try_extract(&self, url: &str) -> Result<String>;

    /// Extracted text, or `None` on any failure. Callers fall back to
    /// whatever text they already hold.
    async fn extract(&self, url: &str) -> Option<String> {
        match self.try_extract(url).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(%url, error = %e, "content extraction failed");
                None
            }
        }
    }
}

/// Readability-based extractor backed by the shared [`Fetcher`].
pub struct ReadabilityExtractor {
    fetcher: Arc<Fetcher>,
}

impl ReadabilityExtractor {
    pub fn new(fetcher: Arc<Fetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ContentExtractor for ReadabilityExtractor {
    async fn try_extract(&self, url: &str) -> Result<String> {
        let page_url = Url::parse(url)?;
        let html = self.fetcher.fetch_text(url).await?;
        extract_main_text(&html, &page_url)
    }
}

/// Run readability over an already fetched and decoded page. Empty results
/// count as failures.
pub fn extract_main_text(html: &str, page_url: &Url) -> Result<String> {
    let mut reader = Cursor::new(html.as_bytes());
    let product = readability::extractor::extract(&mut reader, page_url)
        .map_err(|e| AggregatorError::Extraction(format!("{}: {}", page_url, e)))?;

    let text = product.text.trim().to_string();
    if text.is_empty() {
        return Err(AggregatorError::Extraction(format!("{}: no readable text", page_url)));
    }

    debug!(url = %page_url, chars = text.chars().count(), "extracted main text");
    Ok(text)
}
