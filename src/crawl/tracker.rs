// src/crawl/tracker.rs
// =============================================================================
// Completion tracker: counts tasks that are queued or in flight.
//
// +1 when the frontier admits a task, -1 when a worker finishes one (whatever
// the outcome). The crawl is over when the count is back to zero.
//
// Built on tokio's watch channel: every change is published, and waiters
// re-check the value on each change, so no wakeup can be missed.
// =============================================================================

use tokio::sync::watch;

#[derive(Debug)]
pub struct CompletionTracker {
    outstanding: watch::Sender<usize>,
}

impl CompletionTracker {
    pub fn new() -> Self {
        let (outstanding, _) = watch::channel(0);
        Self { outstanding }
    }

    /// Registers one more unit of outstanding work.
    pub fn add(&self) {
        self.outstanding.send_modify(|count| *count += 1);
    }

    /// Marks one unit of work as finished.
    pub fn done(&self) {
        self.outstanding.send_modify(|count| {
            debug_assert!(*count > 0, "tracker decremented below zero");
            *count = count.saturating_sub(1);
        });
    }

    pub fn outstanding(&self) -> usize {
        *self.outstanding.borrow()
    }

    /// Resolves once no work is outstanding. Returns immediately at zero.
    pub async fn wait(&self) {
        let mut rx = self.outstanding.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait
        let _ = rx.wait_for(|count| *count == 0).await;
    }
}

impl Default for CompletionTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_returns_at_zero() {
        let tracker = CompletionTracker::new();
        tracker.wait().await;
        assert_eq!(tracker.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_wait_blocks_until_done() {
        let tracker = Arc::new(CompletionTracker::new());
        tracker.add();
        tracker.add();

        let waiter = {
            let tracker = tracker.clone();
            tokio::spawn(async move { tracker.wait().await })
        };

        tracker.done();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        tracker.done();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should finish")
            .unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_add_and_done_balance() {
        let tracker = Arc::new(CompletionTracker::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let tracker = tracker.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..500 {
                    tracker.add();
                    tokio::task::yield_now().await;
                    tracker.done();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(tracker.outstanding(), 0);
        tracker.wait().await;
    }
}
