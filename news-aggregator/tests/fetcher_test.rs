mod common;

use common::{init_tracing, test_config, test_fetch_config, MapExtractor};
use mockito::Matcher;
use news_aggregator::sources::extract_candidate_links;
use news_aggregator::{
    ArticleSource, ContentExtractor, FetchConfig, Fetcher, ReadabilityExtractor, RelevanceFilter, SiteFetcher,
    SiteSourceConfig,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// "위안부" in EUC-KR.
const WIANBU_EUC_KR: [u8; 6] = [0xC0, 0xA7, 0xBE, 0xC8, 0xBA, 0xCE];

fn euc_kr_page(before: &str, after: &str) -> Vec<u8> {
    let mut body = before.as_bytes().to_vec();
    body.extend_from_slice(&WIANBU_EUC_KR);
    body.extend_from_slice(after.as_bytes());
    body
}

fn korean_relevance() -> Arc<RelevanceFilter> {
    Arc::new(RelevanceFilter::new(["위안부"]))
}

#[tokio::test]
async fn test_fetch_text_decodes_declared_charset() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;

    let _euc_kr = server
        .mock("GET", "/euc-kr")
        .with_status(200)
        .with_header("content-type", "text/html; charset=euc-kr")
        .with_body(euc_kr_page(r#"<html><body><a href="/news/1">"#, " news</a></body></html>"))
        .create_async()
        .await;
    let _utf8 = server
        .mock("GET", "/utf8")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<p>위안부 기림의 날</p>")
        .create_async()
        .await;

    let fetcher = Fetcher::new(test_fetch_config()).unwrap();

    let html = fetcher.fetch_text(&format!("{}/euc-kr", server.url())).await.unwrap();
    assert!(html.contains(r#"<a href="/news/1">위안부 news</a>"#));

    let base = Url::parse(&server.url()).unwrap();
    let candidates = extract_candidate_links(&html, &base, &korean_relevance(), &HashSet::new(), 5).unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].text, "위안부 news");

    let html = fetcher.fetch_text(&format!("{}/utf8", server.url())).await.unwrap();
    assert_eq!(html, "<p>위안부 기림의 날</p>");
}

#[tokio::test]
async fn test_site_fetcher_reads_euc_kr_search_pages() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    let host = server.url();

    let _search = server
        .mock("GET", Matcher::Regex("^/search".to_string()))
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "text/html; charset=EUC-KR")
        .with_body(euc_kr_page(r#"<html><body><a href="/news/1">"#, " memorial</a></body></html>"))
        .create_async()
        .await;

    let extractor = Arc::new(MapExtractor::new().with_page(format!("{}/news/1", host), "위안부 memorial report"));

    let mut config = test_config();
    config.search_terms = vec!["위안부".to_string()];
    config.sites = vec![SiteSourceConfig {
        name: "Legacy Site".to_string(),
        base_url: host.clone(),
        search_url_template: format!("{}/search?q={{query}}", host),
        category: None,
    }];

    let fetcher = Arc::new(Fetcher::new(test_fetch_config()).unwrap());
    let sites = SiteFetcher::new(&config, fetcher, extractor, korean_relevance());
    let articles = sites.pull().await.unwrap();

    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].title, "위안부 memorial");
    assert_eq!(articles[0].url, format!("{}/news/1", host));
}

#[tokio::test]
async fn test_readability_extractor_reads_euc_kr_articles() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;

    let paragraph = euc_kr_page(
        "<p>Survivors gathered in Seoul this week to remember the victims of the ",
        " system, demanding an apology, a full account, and lasting remembrance.</p>",
    );
    let mut body = b"<html><head><title>Memorial</title></head><body><div class=\"article-body\">".to_vec();
    for _ in 0..3 {
        body.extend_from_slice(&paragraph);
    }
    body.extend_from_slice(b"</div></body></html>");

    let _article = server
        .mock("GET", "/article")
        .with_status(200)
        .with_header("content-type", "text/html; charset=euc-kr")
        .with_body(body)
        .create_async()
        .await;

    let fetcher = Arc::new(Fetcher::new(test_fetch_config()).unwrap());
    let extractor = ReadabilityExtractor::new(fetcher);

    let text = extractor.extract(&format!("{}/article", server.url())).await.unwrap();
    assert!(text.contains("victims of the 위안부 system"));
}

#[tokio::test]
async fn test_throttle_spaces_one_host_without_blocking_others() {
    init_tracing();
    let fetcher = Arc::new(
        Fetcher::new(FetchConfig {
            min_host_interval_ms: 500,
            ..test_fetch_config()
        })
        .unwrap(),
    );

    // The first request to a host goes straight through.
    let started = Instant::now();
    fetcher.throttle("https://slow.example.com/a").await.unwrap();
    assert!(started.elapsed() < Duration::from_millis(250));

    let waiting = tokio::spawn({
        let fetcher = fetcher.clone();
        async move {
            let started = Instant::now();
            fetcher.throttle("https://slow.example.com/b").await.unwrap();
            started.elapsed()
        }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;

    let started = Instant::now();
    fetcher.throttle("https://fast.example.org/a").await.unwrap();
    assert!(started.elapsed() < Duration::from_millis(250));

    let waited = waiting.await.unwrap();
    assert!(waited >= Duration::from_millis(400));
}

#[tokio::test]
async fn test_throttle_disabled_with_zero_interval() {
    init_tracing();
    let fetcher = Fetcher::new(test_fetch_config()).unwrap();

    let started = Instant::now();
    for _ in 0..5 {
        fetcher.throttle("https://news.example.com/").await.unwrap();
    }
    assert!(started.elapsed() < Duration::from_millis(100));
}
