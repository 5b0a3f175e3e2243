// src/crawl/mod.rs
// =============================================================================
// This module is the crawl engine.
//
// Pieces, leaves first:
// - policy:   scheme + allow-list rules and www canonicalization
// - tracker:  counts queued + in-flight tasks, signals when it hits zero
// - frontier: dedup set + task queue
// - worker:   fetch one page, extract links, report the outcome
// - engine:   `Crawler`, which owns all of the above and runs the pool
//
// Rust concepts:
// - Arc: the frontier and reporters are shared by every worker task
// - Mutex: guards the known-set so check-and-insert is atomic
// =============================================================================

mod engine;
mod frontier;
mod policy;
mod tracker;
mod worker;

pub use engine::Crawler;
