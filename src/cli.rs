// src/cli.rs
// =============================================================================
// Command-line interface, parsed with clap's derive API.
//
// Everything has a default, so a bare `butler` reads ./config.json, writes
// into ./report and crawls with 2 workers.
// =============================================================================

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "butler",
    version,
    about = "Crawl a set of domains and report every page and link found",
    long_about = "butler starts at the root of each configured domain, follows every http link \
                  that stays on those domains, and writes a sitemap plus error and ignore lists \
                  into the report directory."
)]
pub struct Cli {
    /// Path to the JSON config file ({"www": bool, "domains": [..]})
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    /// Directory for sitemap.xml, errors.txt, ignored.txt and report.json
    ///
    /// The directory is emptied before the crawl starts.
    #[arg(long, default_value = "report")]
    pub report: PathBuf,

    /// Number of pages fetched concurrently
    #[arg(long, default_value_t = 2)]
    pub pool_size: usize,

    /// Extra domain to accept links for, without seeding it (repeatable)
    #[arg(long = "allow", value_name = "DOMAIN")]
    pub allow: Vec<String>,

    /// Per-request timeout in seconds (no timeout when omitted)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Regular expression used to find links; group 1 is the link
    ///
    /// Defaults to matching the href of every <a> tag.
    #[arg(long)]
    pub link_pattern: Option<String>,

    /// Only write report files, print nothing per page
    #[arg(long, short)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["butler"]);
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert_eq!(cli.report, PathBuf::from("report"));
        assert_eq!(cli.pool_size, 2);
        assert!(cli.link_pattern.is_none());
        assert!(cli.allow.is_empty());
        assert!(cli.timeout_secs.is_none());
        assert!(!cli.quiet);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::parse_from([
            "butler",
            "--config",
            "sites.json",
            "--report",
            "out",
            "--pool-size",
            "8",
            "--allow",
            "cdn.example.com",
            "--allow",
            "static.example.com",
            "--timeout-secs",
            "30",
            "-q",
        ]);
        assert_eq!(cli.config, PathBuf::from("sites.json"));
        assert_eq!(cli.pool_size, 8);
        assert_eq!(cli.allow, vec!["cdn.example.com", "static.example.com"]);
        assert_eq!(cli.timeout_secs, Some(30));
        assert!(cli.quiet);
    }
}
