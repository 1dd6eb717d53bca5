use crate::types::{AggregatorError, ParsedEntry, ParsedFeed, Result};
use feed_rs::parser;
use tracing::debug;

/// Thin wrapper around `feed_rs` that keeps only the fields an article needs.
/// Entries stay in feed-native order.
#[derive(Debug, Default)]
pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_feed(&self, content: &[u8]) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content)
            .map_err(|e| AggregatorError::Parse(format!("Failed to parse feed: {}", e)))?;

        let entries: Vec<ParsedEntry> = feed.entries.into_iter().map(Self::parse_entry).collect();

        debug!(entries = entries.len(), "parsed feed");

        Ok(ParsedFeed { entries })
    }

    fn parse_entry(entry: feed_rs::model::Entry) -> ParsedEntry {
        let title = entry
            .title
            .map(|t| t.content.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Untitled".to_string());

        let link = entry
            .links
            .first()
            .map(|l| l.href.trim().to_string())
            .filter(|href| !href.is_empty());

        let summary = entry.summary.map(|s| s.content).filter(|s| !s.trim().is_empty());

        ParsedEntry {
            link,
            title,
            summary,
            published_at: entry.published,
            updated_at: entry.updated,
        }
    }
}
