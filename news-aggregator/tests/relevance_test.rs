use news_aggregator::config::RelevanceConfig;
use news_aggregator::RelevanceFilter;

fn default_filter() -> RelevanceFilter {
    RelevanceFilter::new(&RelevanceConfig::default().keywords)
}

#[test]
fn test_matches_topic_titles() {
    let filter = default_filter();

    assert!(filter.is_relevant("Comfort Women Memorial", Some("")));
    assert!(!filter.is_relevant("Weather forecast", Some("")));
    assert!(filter.is_relevant("COMFORT WOMEN", None));
}

#[test]
fn test_matches_content_and_local_terms() {
    let filter = default_filter();

    assert!(filter.is_relevant("Daily briefing", Some("Survivors of wartime sexual slavery spoke today")));
    assert!(filter.is_relevant("정의기억연대, 위안부 피해자 기림의 날 추모식 개최", None));
    assert!(!filter.is_relevant("Daily briefing", None));
}

#[test]
fn test_substring_match_without_tokenization() {
    let filter = RelevanceFilter::new(["ianfu"]);

    assert!(filter.is_relevant("The Ianfu issue", None));
    assert!(filter.is_relevant("prefix-IANFUsuffix", None));
    assert!(!filter.is_relevant("ian fu", None));
}

#[test]
fn test_title_and_content_are_joined_with_a_space() {
    let filter = RelevanceFilter::new(["comfort women"]);

    // "comfort" ends the title and "women" starts the content.
    assert!(filter.is_relevant("comfort", Some("women")));
    assert!(!filter.is_relevant("comfortwomen", None));
}

#[test]
fn test_keywords_are_normalized() {
    let filter = RelevanceFilter::new(["  Military Brothel ", "", "   "]);

    assert_eq!(filter.keywords(), &["military brothel".to_string()]);
    assert!(filter.is_relevant("A MILITARY BROTHEL record", None));
}

#[test]
fn test_empty_keyword_list_matches_nothing() {
    let filter = RelevanceFilter::new(Vec::<String>::new());

    assert!(!filter.is_relevant("Comfort Women Memorial", Some("comfort women")));
}
