/// Keyword classifier deciding whether a piece of text is on topic.
///
/// Matching is a plain case-insensitive substring test: no stemming and no
/// tokenization, so `"ianfu"` also matches inside longer words.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    keywords: Vec<String>,
}

impl RelevanceFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_relevant(&self, title: &str, content: Option<&str>) -> bool {
        let text = format!("{} {}", title, content.unwrap_or("")).to_lowercase();
        self.keywords.iter().any(|keyword| text.contains(keyword.as_str()))
    }
}
