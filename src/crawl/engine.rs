// src/crawl/engine.rs
// =============================================================================
// The crawl engine: wires the frontier, the worker pool, the fetcher, the
// link extractor and the reporters together.
//
// Lifecycle:
// 1. Crawler::new(...)          build it
// 2. register_reporter(...)     as many as you like, order is kept
// 3. seed(...) / allow(...)     fill the allow-list and the first tasks
// 4. run(pool_size).await       crawl until nothing is left, then report
//
// `run` consumes the crawler. Once the pool starts the allow-list is frozen,
// and the type system enforces it: `allow` and `seed` need `&mut self`,
// which no longer exists after `run` has taken ownership.
// =============================================================================

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use url::{ParseError, Url};

use super::frontier::{Admission, Frontier};
use super::policy::{AdmissionPolicy, CRAWL_SCHEME};
use super::worker;
use crate::config::Config;
use crate::fetch::{Fetcher, LinkExtractor};
use crate::report::{CrawlSummary, Reporter, ReporterSet};

// State shared by every worker during a run
pub(crate) struct CrawlContext {
    pub(crate) frontier: Frontier,
    pub(crate) reporters: ReporterSet,
    pub(crate) fetcher: Arc<dyn Fetcher>,
    pub(crate) extractor: Arc<dyn LinkExtractor>,
}

impl CrawlContext {
    /// Admits a link and reports it right away when the policy rejects it.
    pub(crate) fn enqueue(&self, link: &str, base: Option<&Url>) -> Result<Admission, ParseError> {
        let admission = self.frontier.admit(link, base)?;
        if let Admission::Ignored(url, reason) = &admission {
            self.reporters.ignored(url, 0, &reason.to_string());
        }
        Ok(admission)
    }
}

pub struct Crawler {
    report_dir: PathBuf,
    context: CrawlContext,
}

impl Crawler {
    /// `allow_www` picks the canonical host form for the whole run.
    pub fn new(
        allow_www: bool,
        report_dir: impl Into<PathBuf>,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn LinkExtractor>,
    ) -> Self {
        Self {
            report_dir: report_dir.into(),
            context: CrawlContext {
                frontier: Frontier::new(AdmissionPolicy::new(allow_www)),
                reporters: ReporterSet::new(),
                fetcher,
                extractor,
            },
        }
    }

    /// Builds a crawler and seeds it with every domain in `config`.
    pub fn from_config(
        config: &Config,
        report_dir: impl Into<PathBuf>,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn LinkExtractor>,
    ) -> Result<Self, ParseError> {
        let mut crawler = Self::new(config.allow_www, report_dir, fetcher, extractor);
        crawler.seed(&config.domains)?;
        Ok(crawler)
    }

    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    pub fn register_reporter(&mut self, reporter: impl Reporter + 'static) {
        self.context.reporters.register(Box::new(reporter));
    }

    /// Permits a host (optionally with a port). Returns its allow-list key.
    pub fn allow(&mut self, domain: &str) -> Result<String, ParseError> {
        self.context.frontier.allow(domain)
    }

    /// Allows each domain and queues its root page.
    pub fn seed<S: AsRef<str>>(&mut self, domains: &[S]) -> Result<(), ParseError> {
        for domain in domains {
            // The key is already lowercased, punycoded and www-canonical
            let key = self.context.frontier.allow(domain.as_ref())?;
            self.context.enqueue(&format!("{}://{}/", CRAWL_SCHEME, key), None)?;
        }

        info!(
            domains = self.context.frontier.policy().allowed_count(),
            queued = self.context.frontier.queued_count(),
            "crawl seeded"
        );
        Ok(())
    }

    /// Crawls until the frontier is drained.
    pub async fn run(self, pool_size: usize) -> CrawlSummary {
        self.run_until(pool_size, CancellationToken::new()).await
    }

    /// Crawls until the frontier is drained or `cancel` fires, whichever
    /// comes first. Reporters are finished in both cases.
    pub async fn run_until(self, pool_size: usize, cancel: CancellationToken) -> CrawlSummary {
        let Crawler { report_dir, context } = self;
        let context = Arc::new(context);

        // Exactly `pool_size` workers, but never zero
        let workers = pool_size.max(1);
        let stop = cancel.child_token();

        info!(workers, pending = context.frontier.outstanding(), "crawl started");
        context.reporters.start();

        let mut pool = JoinSet::new();
        for id in 0..workers {
            pool.spawn(worker::run_worker(id, context.clone(), stop.clone()));
        }

        tokio::select! {
            _ = context.frontier.wait_idle() => {}
            _ = cancel.cancelled() => {
                warn!(outstanding = context.frontier.outstanding(), "crawl cancelled");
            }
        }

        stop.cancel();
        pool.shutdown().await;

        context.reporters.finish(&report_dir);
        let summary = context.reporters.summary();

        info!(
            succeeded = summary.succeeded,
            ignored = summary.ignored,
            errored = summary.errored,
            known = context.frontier.known_count(),
            "crawl finished"
        );
        summary
    }
}
