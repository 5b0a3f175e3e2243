// src/crawl/frontier.rs
// =============================================================================
// The frontier: every URL the crawl has ever seen, plus the queue of pages
// still waiting to be fetched.
//
// How admission works:
// 1. Resolve the raw link against the page it was found on
// 2. Normalize: drop the fragment, empty path -> "/", canonical host
// 3. Dedup on the normalized string (already known -> do nothing)
// 4. Run the admission policy: accepted links become tasks, rejected links
//    are handed back to the caller so they can be reported as ignored
//
// Steps 3 and 4 share one lock on the known-set, so two workers that find the
// same link at the same moment can never both enqueue it.
//
// Rust concepts:
// - Mutex: guards the known-set and the queue across worker tasks
// - BinaryHeap: the pending queue (shortest URL first)
// - Notify: wakes an idle worker when a task is pushed
// =============================================================================

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::{ParseError, Url};

use super::policy::{AdmissionPolicy, IgnoreReason, CRAWL_SCHEME};
use super::tracker::CompletionTracker;

// One page waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub url: Url,
}

// Shorter URLs pop first. Only scheduling depends on this, never correctness.
impl Ord for Task {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .url
            .as_str()
            .len()
            .cmp(&self.url.as_str().len())
            .then_with(|| other.url.as_str().cmp(self.url.as_str()))
    }
}

impl PartialOrd for Task {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// What happened to a link handed to `admit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// New, in scope: a task was queued and the tracker incremented
    Enqueued(Url),
    /// New, out of scope: the caller must report it as ignored
    Ignored(Url, IgnoreReason),
    /// Seen before in this run: nothing happened
    Duplicate,
}

pub struct Frontier {
    policy: AdmissionPolicy,
    known: Mutex<HashSet<String>>,
    queue: Mutex<BinaryHeap<Task>>,
    ready: Notify,
    tracker: CompletionTracker,
}

impl Frontier {
    pub fn new(policy: AdmissionPolicy) -> Self {
        Self {
            policy,
            known: Mutex::new(HashSet::new()),
            queue: Mutex::new(BinaryHeap::new()),
            ready: Notify::new(),
            tracker: CompletionTracker::new(),
        }
    }

    pub fn policy(&self) -> &AdmissionPolicy {
        &self.policy
    }

    // Needs `&mut self`, so the allow-list can only change before the
    // frontier is shared with the worker pool.
    //
    // The domain goes through the same normalization as discovered links
    // (lowercase, punycode, www rule), so both produce identical keys.
    pub fn allow(&mut self, domain: &str) -> Result<String, ParseError> {
        let root = self.normalize(&format!("{}://{}/", CRAWL_SCHEME, domain.trim()), None)?;
        self.policy.allow(&root).ok_or(ParseError::EmptyHost)
    }

    /// Resolves `link` against `base` (when given) and normalizes it.
    pub fn normalize(&self, link: &str, base: Option<&Url>) -> Result<Url, ParseError> {
        let mut url = match base {
            Some(base) => base.join(link)?,
            None => Url::parse(link)?,
        };

        url.set_fragment(None);

        if url.path().is_empty() {
            url.set_path("/");
        }

        // IP literals have no www form
        if let Some(host) = url.domain().filter(|host| !host.is_empty()).map(str::to_string) {
            let canonical = self.policy.canonical_host(&host);
            if canonical != host {
                url.set_host(Some(&canonical))?;
            }
        }

        Ok(url)
    }

    /// Offers a discovered link to the crawl.
    ///
    /// Returns an error only when the link cannot be parsed as a URL. Every
    /// parsed link ends up as exactly one of enqueued, ignored or duplicate.
    pub fn admit(&self, link: &str, base: Option<&Url>) -> Result<Admission, ParseError> {
        let url = self.normalize(link, base)?;

        let mut known = lock(&self.known);
        if !known.insert(url.as_str().to_string()) {
            return Ok(Admission::Duplicate);
        }

        if let Err(reason) = self.policy.check(&url) {
            debug!(url = %url, %reason, "link ignored");
            return Ok(Admission::Ignored(url, reason));
        }

        // Count the task before it becomes visible to workers, so the tracker
        // can never reach zero while this task is still pending.
        self.tracker.add();
        lock(&self.queue).push(Task { url: url.clone() });
        drop(known);

        debug!(url = %url, "task enqueued");
        self.ready.notify_one();
        Ok(Admission::Enqueued(url))
    }

    fn pop(&self) -> Option<Task> {
        let mut queue = lock(&self.queue);
        let task = queue.pop();
        if task.is_some() && !queue.is_empty() {
            // More work left: pass the wakeup on to the next idle worker
            self.ready.notify_one();
        }
        task
    }

    /// Waits for the next task. Returns `None` once `cancel` fires.
    pub async fn next_task(&self, cancel: &CancellationToken) -> Option<Task> {
        loop {
            if cancel.is_cancelled() {
                return None;
            }

            let notified = self.ready.notified();
            if let Some(task) = self.pop() {
                return Some(task);
            }

            tokio::select! {
                _ = notified => {}
                _ = cancel.cancelled() => return None,
            }
        }
    }

    /// Marks one dequeued task as fully processed.
    pub fn task_done(&self) {
        self.tracker.done();
    }

    /// Resolves when nothing is queued and nothing is in flight.
    pub async fn wait_idle(&self) {
        self.tracker.wait().await;
    }

    pub fn outstanding(&self) -> usize {
        self.tracker.outstanding()
    }

    pub fn known_count(&self) -> usize {
        lock(&self.known).len()
    }

    pub fn queued_count(&self) -> usize {
        lock(&self.queue).len()
    }
}

// A panicking worker must not take the whole crawl down with a poisoned lock
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why std::sync::Mutex and not tokio's?
//    - The locks are never held across an .await
//    - std's mutex is cheaper and `admit` can stay a plain (non-async) fn
//
// 2. Why is `notified()` created before checking the queue?
//    - Notify::notify_one stores a permit when nobody is waiting yet
//    - A push that lands between "queue is empty" and ".await" is therefore
//      not lost: the pending Notified picks up the stored permit
//
// 3. Why do ignored links go into the known-set too?
//    - So an external link found on 500 pages is reported once, not 500 times
// -----------------------------------------------------------------------------
