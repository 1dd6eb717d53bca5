use crate::types::{Article, Result};
use async_trait::async_trait;

/// A kind of origin (feeds, searchable sites, ...) that yields articles.
///
/// Implementations contain per-source failures themselves and only return
/// `Err` when the whole run could not happen.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Short label used in logs, e.g. `"feeds"`.
    fn source_kind(&self) -> &'static str;

    /// Fetch every configured origin once.
    async fn pull(&self) -> Result<Vec<Article>>;
}
