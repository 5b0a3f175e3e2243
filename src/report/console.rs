// src/report/console.rs
// =============================================================================
// Prints one line per outcome to stdout, then a summary when the crawl ends.
//
// Diagnostics go through `tracing` on stderr; this reporter is the crawl's
// actual output, so it uses println! like any other CLI result.
// =============================================================================

use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use url::Url;

use super::Reporter;

#[derive(Debug, Default)]
pub struct ConsoleReporter {
    ok: AtomicUsize,
    ignored: AtomicUsize,
    broken: AtomicUsize,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

// Status column: "---" for links that were never fetched
fn format_status(status: u16) -> String {
    if status == 0 {
        "---".to_string()
    } else {
        status.to_string()
    }
}

impl Reporter for ConsoleReporter {
    fn start(&self) {
        println!("🔍 Crawling...\n");
        println!("{:<10} {:<5} {}", "OUTCOME", "CODE", "URL");
        println!("{}", "=".repeat(80));
    }

    fn success(&self, url: &Url, status: u16) {
        self.ok.fetch_add(1, Ordering::Relaxed);
        println!("{:<10} {:<5} {}", "✅ OK", format_status(status), url);
    }

    fn ignored(&self, url: &Url, status: u16, reason: &str) {
        self.ignored.fetch_add(1, Ordering::Relaxed);
        println!("{:<10} {:<5} {} ({})", "➖ SKIP", format_status(status), url, reason);
    }

    fn error(&self, url: &Url, status: u16, reason: &str) {
        self.broken.fetch_add(1, Ordering::Relaxed);
        println!("{:<10} {:<5} {} ({})", "❌ ERROR", format_status(status), url, reason);
    }

    fn finish(&self, report_dir: &Path) -> io::Result<()> {
        let ok = self.ok.load(Ordering::Relaxed);
        let ignored = self.ignored.load(Ordering::Relaxed);
        let broken = self.broken.load(Ordering::Relaxed);

        println!();
        println!("📊 Summary:");
        println!("   ✅ OK: {}", ok);
        println!("   ➖ Ignored: {}", ignored);
        println!("   ❌ Errors: {}", broken);
        println!("   📋 Total: {}", ok + ignored + broken);
        println!("📁 Reports written to {}", report_dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_status() {
        assert_eq!(format_status(0), "---");
        assert_eq!(format_status(404), "404");
    }

    #[test]
    fn test_counts_outcomes() {
        let reporter = ConsoleReporter::new();
        let url = Url::parse("http://example.com/").unwrap();
        reporter.success(&url, 200);
        reporter.error(&url, 500, "HTTP 500");
        reporter.error(&url, 0, "connection failed");

        assert_eq!(reporter.ok.load(Ordering::Relaxed), 1);
        assert_eq!(reporter.broken.load(Ordering::Relaxed), 2);
        assert_eq!(reporter.ignored.load(Ordering::Relaxed), 0);
    }
}
