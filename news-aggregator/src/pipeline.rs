use crate::aggregator::Aggregator;
use crate::config::AggregatorConfig;
use crate::digest::{HeadlineDigest, Summarizer};
use crate::store::ArticleStore;
use crate::types::{CycleReport, Result};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

/// Owns the long-lived store and runs fetch → aggregate → merge cycles,
/// one at a time.
pub struct NewsPipeline {
    aggregator: Arc<Aggregator>,
    store: Arc<ArticleStore>,
    summarizer: Arc<dyn Summarizer>,
    digest_articles: usize,
    cycle_lock: Mutex<()>,
}

impl NewsPipeline {
    pub fn new(aggregator: Aggregator, store: Arc<ArticleStore>) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            store,
            summarizer: Arc::new(HeadlineDigest::default()),
            digest_articles: 5,
            cycle_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &AggregatorConfig) -> Result<Self> {
        let aggregator = Aggregator::from_config(config)?;
        let store = Arc::new(ArticleStore::new(config.limits.store_capacity));
        Ok(Self::new(aggregator, store).with_digest_articles(config.limits.digest_articles))
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = summarizer;
        self
    }

    pub fn with_digest_articles(mut self, count: usize) -> Self {
        self.digest_articles = count;
        self
    }

    pub fn store(&self) -> Arc<ArticleStore> {
        self.store.clone()
    }

    /// Run one cycle. Overlapping calls wait for the running cycle to finish.
    /// Never fails: any error, including a panic while fetching, is reported
    /// as an unsuccessful cycle that added nothing.
    pub async fn run_cycle(&self) -> CycleReport {
        let _guard = self.cycle_lock.lock().await;

        let cycle_id = Uuid::new_v4();
        let started_at = Utc::now();

        async move {
            info!("starting news update");

            let aggregator = self.aggregator.clone();
            let fetched = tokio::spawn(async move { aggregator.aggregate().await }.in_current_span()).await;

            match fetched {
                Ok(articles) => {
                    let fetched_count = articles.len();
                    let added_count = self.store.merge(articles).await;
                    let total_count = self.store.len().await;
                    info!(
                        fetched = fetched_count,
                        added = added_count,
                        total = total_count,
                        capacity = self.store.capacity(),
                        "news update completed"
                    );

                    CycleReport {
                        cycle_id,
                        success: true,
                        added_count,
                        total_count,
                        started_at,
                        finished_at: Utc::now(),
                        error: None,
                    }
                }
                Err(e) => {
                    error!(error = %e, "news update failed");
                    CycleReport {
                        cycle_id,
                        success: false,
                        added_count: 0,
                        total_count: self.store.len().await,
                        started_at,
                        finished_at: Utc::now(),
                        error: Some(e.to_string()),
                    }
                }
            }
        }
        .instrument(info_span!("cycle", %cycle_id))
        .await
    }

    /// Digest of the most recent stored articles, if the summarizer has one.
    pub async fn digest(&self) -> Option<String> {
        let snapshot = self.store.snapshot().await;
        let recent = &snapshot[..snapshot.len().min(self.digest_articles)];
        if recent.is_empty() {
            return None;
        }

        info!(summarizer = %self.summarizer.name(), articles = recent.len(), "generating digest");
        self.summarizer.summarize(recent).await
    }
}
