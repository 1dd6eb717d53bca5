pub mod feed;
pub mod site;

pub use feed::FeedFetcher;
pub use site::{extract_candidate_links, CandidateLink, SiteFetcher};
