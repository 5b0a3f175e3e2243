// src/report/files.rs
// =============================================================================
// Plain-text lists of problem links: errors.txt and ignored.txt.
//
// One line per event: "<status>\t<url>\t<reason>". Tab-separated so the files
// can be fed straight into `cut` or a spreadsheet.
// =============================================================================

use std::io;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use url::Url;

use super::Reporter;

pub const ERRORS_FILE: &str = "errors.txt";
pub const IGNORED_FILE: &str = "ignored.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Error,
    Ignored,
}

#[derive(Debug)]
pub struct OutcomeListReporter {
    outcome: Outcome,
    lines: Mutex<Vec<String>>,
}

impl OutcomeListReporter {
    /// Collects error events into errors.txt.
    pub fn errors() -> Self {
        Self::new(Outcome::Error)
    }

    /// Collects ignored events into ignored.txt.
    pub fn ignored() -> Self {
        Self::new(Outcome::Ignored)
    }

    fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            lines: Mutex::new(Vec::new()),
        }
    }

    fn file_name(&self) -> &'static str {
        match self.outcome {
            Outcome::Error => ERRORS_FILE,
            Outcome::Ignored => IGNORED_FILE,
        }
    }

    fn record(&self, url: &Url, status: u16, reason: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("{}\t{}\t{}", status, url, reason));
    }
}

impl Reporter for OutcomeListReporter {
    fn success(&self, _url: &Url, _status: u16) {}

    fn ignored(&self, url: &Url, status: u16, reason: &str) {
        if self.outcome == Outcome::Ignored {
            self.record(url, status, reason);
        }
    }

    fn error(&self, url: &Url, status: u16, reason: &str) {
        if self.outcome == Outcome::Error {
            self.record(url, status, reason);
        }
    }

    fn finish(&self, report_dir: &Path) -> io::Result<()> {
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner).clone();
        lines.sort();

        let mut contents = lines.join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }
        std::fs::write(report_dir.join(self.file_name()), contents)
    }
}
