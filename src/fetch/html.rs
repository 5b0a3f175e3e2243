// src/fetch/html.rs
// =============================================================================
// This module pulls raw link targets out of HTML.
//
// No DOM here: a regular expression finds `<a ... href="...">` and captures
// the attribute value. That is good enough for crawling, cheap, and never
// fails on broken markup. The values come back exactly as written in the
// page (still HTML-escaped, possibly relative); the crawl worker resolves
// them.
//
// Rust concepts:
// - Traits: `LinkExtractor` lets the engine use any extraction strategy
// - Cow<str>: unescaping only allocates when the string actually changes
// =============================================================================

use std::borrow::Cow;

use regex::Regex;

/// Matches an opening anchor tag and captures its quoted href value.
///
/// The whitespace after `a` keeps `<abbr>`, `<area>` and friends out.
pub const ANCHOR_HREF_PATTERN: &str = r#"[<]a\s[^>]*href[=]["']([^"']+)["']"#;

/// Turns a page body into the raw href strings it contains.
pub trait LinkExtractor: Send + Sync {
    fn extract(&self, html: &str) -> Vec<String>;
}

// Regex-based extractor, compiled once and shared by every worker
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    pattern: Regex,
}

impl PatternExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        Self::with_pattern(ANCHOR_HREF_PATTERN)
    }

    /// Uses a custom pattern. Capture group 1 is the link; without a group
    /// the whole match is used.
    pub fn with_pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl LinkExtractor for PatternExtractor {
    fn extract(&self, html: &str) -> Vec<String> {
        self.pattern
            .captures_iter(html)
            .filter_map(|captures| captures.get(1).or_else(|| captures.get(0)))
            .map(|link| link.as_str().to_string())
            .collect()
    }
}

/// Decodes HTML entities in an href (`&amp;` -> `&`).
pub fn unescape_href(raw: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Vec<String> {
        PatternExtractor::new().unwrap().extract(html)
    }

    #[test]
    fn test_extract_double_and_single_quotes() {
        let html = r#"<a href="/docs">Docs</a> <a href='/about'>About</a>"#;
        assert_eq!(extract(html), vec!["/docs", "/about"]);
    }

    #[test]
    fn test_extract_with_other_attributes() {
        let html = r#"<a class="nav" id="home" href="http://example.com/">Home</a>"#;
        assert_eq!(extract(html), vec!["http://example.com/"]);
    }

    #[test]
    fn test_keeps_links_raw() {
        let html = r##"<a href="#top">Top</a><a href="/q?a=1&amp;b=2">Q</a>"##;
        assert_eq!(extract(html), vec!["#top", "/q?a=1&amp;b=2"]);
    }

    #[test]
    fn test_ignores_non_anchor_tags() {
        let html = r#"<link href="/style.css"><img src="/logo.png"><area href="/map">"#;
        assert!(extract(html).is_empty());

        let html = r#"<abbr title="x" href="/abbr">x</abbr><audio href="/a.mp3">"#;
        assert!(extract(html).is_empty());
    }

    #[test]
    fn test_extract_anchor_split_over_lines() {
        let html = "<a\n   href=\"/next\">Next</a>";
        assert_eq!(extract(html), vec!["/next"]);
    }

    #[test]
    fn test_custom_pattern_without_group_uses_whole_match() {
        let extractor = PatternExtractor::with_pattern(r"http://[a-z.]+/").unwrap();
        let links = extractor.extract("see http://a.com/ and http://b.org/ too");
        assert_eq!(links, vec!["http://a.com/", "http://b.org/"]);
    }

    #[test]
    fn test_invalid_custom_pattern_is_rejected() {
        assert!(PatternExtractor::with_pattern("(unclosed").is_err());
    }

    #[test]
    fn test_unescape_href() {
        assert_eq!(unescape_href("/q?a=1&amp;b=2"), "/q?a=1&b=2");
        assert_eq!(unescape_href("/plain"), "/plain");
    }
}
