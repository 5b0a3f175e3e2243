// src/crawl/worker.rs
// =============================================================================
// The fetch worker: takes one task at a time from the frontier and turns it
// into exactly one reported outcome.
//
// Per page:
// 1. GET it                         -> transport failure: error (status 0)
// 2. Status must be exactly 200     -> otherwise: error (with the status)
// 3. Content-Type must be text/html -> otherwise: ignored
// 4. Extract links, feed each one back into the frontier
// 5. Report success
//
// Whatever happens, the worker calls `task_done` afterwards so the
// completion tracker stays balanced.
// =============================================================================

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use super::engine::CrawlContext;
use super::frontier::Admission;
use crate::fetch::unescape_href;

const HTML_CONTENT_TYPE: &str = "text/html";

/// Drains the frontier until `stop` fires.
pub(crate) async fn run_worker(id: usize, context: Arc<CrawlContext>, stop: CancellationToken) {
    debug!(worker = id, "worker started");

    while let Some(task) = context.frontier.next_task(&stop).await {
        debug!(worker = id, url = %task.url, "fetching");
        process_page(&context, &task.url).await;
        context.frontier.task_done();
    }

    debug!(worker = id, "worker stopped");
}

async fn process_page(context: &CrawlContext, page: &Url) {
    let response = match context.fetcher.get(page).await {
        Ok(response) => response,
        Err(e) => {
            context.reporters.error(page, 0, &e.to_string());
            return;
        }
    };

    // Exactly 200: redirects and other 2xx codes count as errors
    let status = response.status();
    if status != 200 {
        context.reporters.error(page, status, &format!("HTTP {}", status));
        return;
    }

    if !response.content_type().starts_with(HTML_CONTENT_TYPE) {
        let reason = format!("content-type: {}", response.content_type());
        context.reporters.ignored(page, 0, &reason);
        return;
    }

    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => {
            context.reporters.error(page, status, &e.to_string());
            return;
        }
    };

    let html = String::from_utf8_lossy(&body);
    let mut enqueued = 0usize;

    for raw in context.extractor.extract(&html) {
        let link = unescape_href(&raw);

        // Same-page anchors
        if link.starts_with('#') {
            continue;
        }

        match context.enqueue(&link, Some(page)) {
            Ok(Admission::Enqueued(_)) => enqueued += 1,
            Ok(_) => {}
            Err(e) => warn!(page = %page, link = %link, error = %e, "invalid url"),
        }
    }

    debug!(url = %page, new_links = enqueued, "page processed");
    context.reporters.success(page, status);
}
