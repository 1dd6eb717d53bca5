/// Text processing utilities
pub mod text {
    /// Keep the first `max_chars` characters, appending `...` when anything
    /// was cut. Counts characters, not bytes, so multi-byte scripts are safe.
    pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
            None => text.to_string(),
        }
    }

    /// Collapse runs of whitespace into single spaces and trim the ends.
    pub fn collapse_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// URL utilities
pub mod url {
    use crate::config::QUERY_PLACEHOLDER;
    use url::{form_urlencoded, Url};

    /// Resolve `href` against `base`. Only http(s) results are returned.
    pub fn resolve(base: &Url, href: &str) -> Option<String> {
        let resolved = base.join(href.trim()).ok()?;
        match resolved.scheme() {
            "http" | "https" => Some(resolved.to_string()),
            _ => None,
        }
    }

    pub fn is_http_url(url_str: &str) -> bool {
        Url::parse(url_str)
            .map(|url| url.scheme() == "http" || url.scheme() == "https")
            .unwrap_or(false)
    }

    /// Substitute the form-encoded `term` into a search URL template.
    /// Templates without a `{query}` placeholder get `?q=` (or `&q=`) appended.
    pub fn build_search_url(template: &str, term: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(term.as_bytes()).collect();
        if template.contains(QUERY_PLACEHOLDER) {
            template.replace(QUERY_PLACEHOLDER, &encoded)
        } else {
            let separator = if template.contains('?') { '&' } else { '?' };
            format!("{}{}q={}", template, separator, encoded)
        }
    }
}
