// src/report/memory.rs
// Test reporter: keeps every event in memory for assertions.

use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use url::Url;

use super::{Event, Reporter};

#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<Event>>,
    started: AtomicBool,
    finished: AtomicBool,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// All events recorded for one URL.
    pub fn events_for(&self, url: &str) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|event| event_url(event) == url)
            .collect()
    }

    pub fn started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

fn event_url(event: &Event) -> &str {
    match event {
        Event::Success { url, .. } | Event::Ignored { url, .. } | Event::Error { url, .. } => url,
    }
}

impl Reporter for MemoryReporter {
    fn start(&self) {
        self.started.store(true, Ordering::SeqCst);
    }

    fn success(&self, url: &Url, status: u16) {
        self.events.lock().unwrap().push(Event::Success {
            url: url.to_string(),
            status,
        });
    }

    fn ignored(&self, url: &Url, status: u16, reason: &str) {
        self.events.lock().unwrap().push(Event::Ignored {
            url: url.to_string(),
            status,
            reason: reason.to_string(),
        });
    }

    fn error(&self, url: &Url, status: u16, reason: &str) {
        self.events.lock().unwrap().push(Event::Error {
            url: url.to_string(),
            status,
            reason: reason.to_string(),
        });
    }

    fn finish(&self, _report_dir: &Path) -> io::Result<()> {
        self.finished.store(true, Ordering::SeqCst);
        Ok(())
    }
}
