// src/fetch/http.rs
// =============================================================================
// This module fetches pages over HTTP.
//
// The crawl engine only talks to the `Fetcher` trait, never to reqwest
// directly. That keeps the engine testable: tests plug in an in-memory site,
// the binary plugs in `HttpFetcher`.
//
// Key behavior:
// - Plain GET, no retries
// - Redirects are NOT followed (a 301 comes back as a 301)
// - The body is only downloaded when the caller asks for it, so pages with a
//   bad status or the wrong content type never transfer their body
//
// Rust concepts:
// - Traits + async-trait: an async method callable through `dyn Fetcher`
// - thiserror: a typed error enum with Display generated for us
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect, Client};
use thiserror::Error;
use url::Url;

/// Default User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("butler/", env!("CARGO_PKG_VERSION"));

// Ways a fetch can fail before we have a response to look at
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request timed out (only possible when a timeout is configured)
    #[error("request timed out")]
    Timeout,
    /// DNS failure, refused connection, TLS failure, ...
    #[error("connection failed: {0}")]
    Connect(String),
    /// Anything else reqwest reports, including errors while reading the body
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

// Sorts reqwest errors into the buckets above
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else {
        FetchError::Http(error)
    }
}

enum Body {
    Pending(reqwest::Response),
    Buffered(Vec<u8>),
}

/// A response whose status and headers are known but whose body may not
/// have been read yet.
pub struct FetchResponse {
    status: u16,
    content_type: String,
    body: Body,
}

impl FetchResponse {
    /// Builds a response from bytes already in memory.
    pub fn buffered(status: u16, content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            body: Body::Buffered(body.into()),
        }
    }

    fn pending(response: reqwest::Response) -> Self {
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        Self {
            status: response.status().as_u16(),
            content_type,
            body: Body::Pending(response),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Raw `Content-Type` header, empty when the server sent none.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Reads the whole body.
    pub async fn bytes(self) -> Result<Vec<u8>, FetchError> {
        match self.body {
            Body::Buffered(bytes) => Ok(bytes),
            Body::Pending(response) => {
                let bytes = response.bytes().await.map_err(categorize_error)?;
                Ok(bytes.to_vec())
            }
        }
    }
}

/// Anything that can GET a URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &Url) -> Result<FetchResponse, FetchError>;
}

// Settings for the reqwest client
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub user_agent: String,
    /// `None` means requests may take as long as they take
    pub timeout: Option<Duration>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

// The real network fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(options: &FetchOptions) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .user_agent(options.user_agent.as_str())
            .redirect(redirect::Policy::none());

        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(categorize_error)?;

        Ok(FetchResponse::pending(response))
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why redirect::Policy::none()?
//    - reqwest follows up to 10 redirects by default
//    - The crawler wants to see the 3xx itself and report it as an error,
//      the target page will be crawled anyway if something links to it
//
// 2. Why is the body behind an enum?
//    - A reqwest::Response streams its body lazily
//    - Tests have no socket, so they hand in bytes directly
//    - Both end up in the same `bytes()` call
// -----------------------------------------------------------------------------
