// src/report/mod.rs
// =============================================================================
// Reporting: the crawl engine never stores results, it announces them.
//
// Every page or link ends in exactly one event:
// - success: fetched with 200 and its links were processed
// - ignored: out of scope (policy) or not HTML (content type)
// - error:   the fetch failed or the status was not 200
//
// Any number of reporters can be registered. `ReporterSet` forwards each
// event to all of them in registration order and keeps the totals that the
// CLI uses for its exit code.
//
// Submodules:
// - console: human-readable lines on stdout
// - sitemap: sitemap.xml of every successful page
// - files:   errors.txt / ignored.txt
// - json:    report.json with every event
// =============================================================================

mod console;
mod files;
mod json;
#[cfg(test)]
mod memory;
mod sitemap;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

pub use console::ConsoleReporter;
pub use files::OutcomeListReporter;
pub use json::JsonReporter;
#[cfg(test)]
pub use memory::MemoryReporter;
pub use sitemap::SitemapReporter;

/// Receives crawl outcomes.
///
/// Called concurrently from every worker, hence `Send + Sync` and `&self`.
pub trait Reporter: Send + Sync {
    /// Once, before the first fetch.
    fn start(&self) {}

    fn success(&self, url: &Url, status: u16);

    /// `status` is 0 when the link was never fetched.
    fn ignored(&self, url: &Url, status: u16, reason: &str);

    /// `status` is 0 for transport failures.
    fn error(&self, url: &Url, status: u16, reason: &str);

    /// Once, after the crawl has drained. File-backed reporters write here.
    fn finish(&self, _report_dir: &Path) -> io::Result<()> {
        Ok(())
    }
}

// Lets callers keep a handle on a reporter after registering it
impl<R: Reporter + ?Sized> Reporter for Arc<R> {
    fn start(&self) {
        (**self).start()
    }

    fn success(&self, url: &Url, status: u16) {
        (**self).success(url, status)
    }

    fn ignored(&self, url: &Url, status: u16, reason: &str) {
        (**self).ignored(url, status, reason)
    }

    fn error(&self, url: &Url, status: u16, reason: &str) {
        (**self).error(url, status, reason)
    }

    fn finish(&self, report_dir: &Path) -> io::Result<()> {
        (**self).finish(report_dir)
    }
}

// One reported outcome, in a shape serde can write out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Event {
    Success { url: String, status: u16 },
    Ignored { url: String, status: u16, reason: String },
    Error { url: String, status: u16, reason: String },
}

/// Totals for one crawl run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlSummary {
    pub succeeded: usize,
    pub ignored: usize,
    pub errored: usize,
}

impl CrawlSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.ignored + self.errored
    }

    pub fn has_errors(&self) -> bool {
        self.errored > 0
    }
}

// Fans events out to every registered reporter
#[derive(Default)]
pub struct ReporterSet {
    reporters: Vec<Box<dyn Reporter>>,
    succeeded: AtomicUsize,
    ignored: AtomicUsize,
    errored: AtomicUsize,
}

impl ReporterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, reporter: Box<dyn Reporter>) {
        self.reporters.push(reporter);
    }

    pub fn start(&self) {
        for reporter in &self.reporters {
            reporter.start();
        }
    }

    pub fn success(&self, url: &Url, status: u16) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
        for reporter in &self.reporters {
            reporter.success(url, status);
        }
    }

    pub fn ignored(&self, url: &Url, status: u16, reason: &str) {
        self.ignored.fetch_add(1, Ordering::Relaxed);
        for reporter in &self.reporters {
            reporter.ignored(url, status, reason);
        }
    }

    pub fn error(&self, url: &Url, status: u16, reason: &str) {
        self.errored.fetch_add(1, Ordering::Relaxed);
        for reporter in &self.reporters {
            reporter.error(url, status, reason);
        }
    }

    // A reporter that cannot write its file must not stop the others
    pub fn finish(&self, report_dir: &Path) {
        for reporter in &self.reporters {
            if let Err(e) = reporter.finish(report_dir) {
                warn!(dir = %report_dir.display(), error = %e, "reporter failed to finish");
            }
        }
    }

    pub fn summary(&self) -> CrawlSummary {
        CrawlSummary {
            succeeded: self.succeeded.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            errored: self.errored.load(Ordering::Relaxed),
        }
    }
}

/// Empties the report directory (creating it if needed) and returns its
/// absolute path.
pub fn prepare_report_dir(path: &Path) -> io::Result<PathBuf> {
    let dir = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    match std::fs::remove_dir_all(&dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    std::fs::create_dir_all(&dir)?;

    Ok(dir)
}
