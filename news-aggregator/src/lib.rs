pub mod types;
pub mod config;
pub mod fetcher;
pub mod parser;
pub mod relevance;
pub mod extractor;
pub mod traits;
pub mod sources;
pub mod aggregator;
pub mod store;
pub mod digest;
pub mod pipeline;
pub mod utils;

pub use types::*;
pub use config::{AggregatorConfig, FeedSourceConfig, SiteSourceConfig};
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use relevance::RelevanceFilter;
pub use extractor::{ContentExtractor, ReadabilityExtractor};
pub use traits::ArticleSource;
pub use sources::{FeedFetcher, SiteFetcher};
pub use aggregator::Aggregator;
pub use store::ArticleStore;
pub use digest::{HeadlineDigest, Summarizer};
pub use pipeline::NewsPipeline;
