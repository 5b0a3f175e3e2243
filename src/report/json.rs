// src/report/json.rs
// =============================================================================
// Writes report.json: every event of the run plus the totals.
//
// Meant for CI pipelines and scripts; humans read the console output.
// =============================================================================

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use url::Url;

use super::{CrawlSummary, Event, Reporter};

pub const JSON_REPORT_FILE: &str = "report.json";

// The file layout
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    summary: CrawlSummary,
    events: &'a [Event],
}

#[derive(Debug, Default)]
pub struct JsonReporter {
    events: Mutex<Vec<Event>>,
}

impl JsonReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

fn summarize(events: &[Event]) -> CrawlSummary {
    events.iter().fold(CrawlSummary::default(), |mut summary, event| {
        match event {
            Event::Success { .. } => summary.succeeded += 1,
            Event::Ignored { .. } => summary.ignored += 1,
            Event::Error { .. } => summary.errored += 1,
        }
        summary
    })
}

impl Reporter for JsonReporter {
    fn success(&self, url: &Url, status: u16) {
        self.push(Event::Success {
            url: url.to_string(),
            status,
        });
    }

    fn ignored(&self, url: &Url, status: u16, reason: &str) {
        self.push(Event::Ignored {
            url: url.to_string(),
            status,
            reason: reason.to_string(),
        });
    }

    fn error(&self, url: &Url, status: u16, reason: &str) {
        self.push(Event::Error {
            url: url.to_string(),
            status,
            reason: reason.to_string(),
        });
    }

    fn finish(&self, report_dir: &Path) -> io::Result<()> {
        let events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        let report = JsonReport {
            summary: summarize(&events),
            events: &events,
        };

        let mut writer = BufWriter::new(File::create(report_dir.join(JSON_REPORT_FILE))?);
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writer.flush()
    }
}
