// src/report/sitemap.rs
// =============================================================================
// Writes sitemap.xml (sitemaps.org format) listing every page that was
// fetched successfully. URLs are sorted so two crawls of the same site give
// byte-identical files.
// =============================================================================

use std::fmt::Write as _;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use url::Url;

use super::Reporter;

pub const SITEMAP_FILE: &str = "sitemap.xml";

#[derive(Debug, Default)]
pub struct SitemapReporter {
    pages: Mutex<Vec<String>>,
}

impl SitemapReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn render(&self) -> String {
        let mut pages = self
            .pages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        pages.sort();
        pages.dedup();

        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
        );
        for page in &pages {
            // Writing into a String cannot fail
            let _ = writeln!(
                xml,
                "  <url><loc>{}</loc></url>",
                html_escape::encode_text(page)
            );
        }
        xml.push_str("</urlset>\n");
        xml
    }
}

impl Reporter for SitemapReporter {
    fn success(&self, url: &Url, _status: u16) {
        self.pages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(url.to_string());
    }

    fn ignored(&self, _url: &Url, _status: u16, _reason: &str) {}

    fn error(&self, _url: &Url, _status: u16, _reason: &str) {}

    fn finish(&self, report_dir: &Path) -> io::Result<()> {
        std::fs::write(report_dir.join(SITEMAP_FILE), self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sitemap_lists_only_successes_sorted() {
        let reporter = SitemapReporter::new();
        reporter.success(&Url::parse("http://example.com/b").unwrap(), 200);
        reporter.success(&Url::parse("http://example.com/a").unwrap(), 200);
        reporter.error(&Url::parse("http://example.com/c").unwrap(), 404, "HTTP 404");

        let tmp = tempfile::tempdir().unwrap();
        reporter.finish(tmp.path()).unwrap();
        let xml = std::fs::read_to_string(tmp.path().join(SITEMAP_FILE)).unwrap();

        let a = xml.find("http://example.com/a").unwrap();
        let b = xml.find("http://example.com/b").unwrap();
        assert!(a < b);
        assert!(!xml.contains("http://example.com/c"));
        assert!(xml.starts_with("<?xml"));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_sitemap_escapes_ampersands() {
        let reporter = SitemapReporter::new();
        reporter.success(&Url::parse("http://example.com/q?a=1&b=2").unwrap(), 200);
        let xml = reporter.render();
        assert!(xml.contains("http://example.com/q?a=1&amp;b=2"));
    }
}
