// src/main.rs
// =============================================================================
// Entry point of the butler crawler.
//
// What happens here:
// 1. Parse command-line arguments and set up logging
// 2. Load the config and build the crawler (fetcher, extractor, reporters)
// 3. Empty the report directory and run the crawl
// 4. Exit with proper code (0 = clean crawl, 1 = errors found, 2 = failure)
// =============================================================================

mod cli;
mod config;
mod crawl;
mod fetch;
mod report;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use config::Config;
use crawl::Crawler;
use fetch::{FetchOptions, HttpFetcher, PatternExtractor};
use report::{ConsoleReporter, JsonReporter, OutcomeListReporter, SitemapReporter};

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so they never mix with the report on stdout
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "butler=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// Returns:
//   Ok(0) = every fetched page came back 200
//   Ok(1) = at least one error was reported
//   Err   = the crawl could not be set up
async fn run(cli: Cli) -> Result<i32> {
    let config = Config::load(&cli.config)?;
    info!(
        config = %cli.config.display(),
        domains = config.domains.len(),
        www = config.allow_www,
        "configuration loaded"
    );

    let options = FetchOptions {
        timeout: cli.timeout_secs.map(Duration::from_secs),
        ..FetchOptions::default()
    };
    let fetcher = HttpFetcher::new(&options).context("Failed to create HTTP client")?;
    let extractor = match &cli.link_pattern {
        Some(pattern) => PatternExtractor::with_pattern(pattern)
            .with_context(|| format!("Invalid link pattern '{}'", pattern))?,
        None => PatternExtractor::new().context("Failed to compile link pattern")?,
    };

    let report_dir = report::prepare_report_dir(&cli.report).with_context(|| {
        format!("Failed to prepare report directory {}", cli.report.display())
    })?;

    let mut crawler = Crawler::from_config(&config, report_dir, Arc::new(fetcher), Arc::new(extractor))
        .context("Config contains a domain that is not a valid host")?;

    crawler.register_reporter(SitemapReporter::new());
    if !cli.quiet {
        crawler.register_reporter(ConsoleReporter::new());
    }
    crawler.register_reporter(OutcomeListReporter::errors());
    crawler.register_reporter(OutcomeListReporter::ignored());
    crawler.register_reporter(JsonReporter::new());

    for domain in &cli.allow {
        let host = crawler
            .allow(domain)
            .with_context(|| format!("Invalid --allow domain '{}'", domain))?;
        info!(host = %host, "extra domain allowed");
    }

    info!(report = %crawler.report_dir().display(), pool_size = cli.pool_size, "starting crawl");
    let summary = crawler.run(cli.pool_size).await;

    info!(pages = summary.total(), "done");
    if summary.has_errors() {
        Ok(1)
    } else {
        Ok(0)
    }
}
