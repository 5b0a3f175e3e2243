// src/fetch/mod.rs
// =============================================================================
// Everything that touches the outside world for a single page.
//
// Submodules:
// - http: GET a URL (the `Fetcher` trait and its reqwest implementation)
// - html: find link targets in a page body (the `LinkExtractor` trait)
// =============================================================================

mod html;
mod http;

pub use html::{unescape_href, LinkExtractor, PatternExtractor};
pub use http::{FetchError, FetchOptions, FetchResponse, Fetcher, HttpFetcher};
