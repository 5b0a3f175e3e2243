// src/crawl/policy.rs
// =============================================================================
// Admission policy: decides whether a discovered link becomes a fetch task.
//
// Two rules:
// 1. The scheme must be exactly "http"
// 2. The canonical host (plus any explicit port) must be on the allow-list
//
// Host canonicalization is controlled by a single `allow_www` switch so that
// "example.com" and "www.example.com" always collapse into one form. The same
// function runs on seed domains and on discovered links, otherwise the
// allow-list lookup and the dedup key would disagree.
// =============================================================================

use std::collections::HashSet;
use std::fmt;
use url::Url;

const WWW_PREFIX: &str = "www.";

/// The only scheme the crawler follows.
pub const CRAWL_SCHEME: &str = "http";

// Why a link was not turned into a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Host is not on the allow-list
    ExternalDomain,
    /// Anything that is not plain http (https, mailto, ftp, ...)
    WrongScheme(String),
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::ExternalDomain => write!(f, "external domain"),
            IgnoreReason::WrongScheme(scheme) => write!(f, "wrong scheme: {}", scheme),
        }
    }
}

// Scheme + allow-list rules, plus the www canonicalization they share
#[derive(Debug, Clone, Default)]
pub struct AdmissionPolicy {
    allow_www: bool,
    allowed: HashSet<String>,
}

impl AdmissionPolicy {
    pub fn new(allow_www: bool) -> Self {
        Self {
            allow_www,
            allowed: HashSet::new(),
        }
    }

    /// Maps a host onto its one canonical `www.` form.
    ///
    /// Idempotent: `canonical_host(canonical_host(h)) == canonical_host(h)`.
    pub fn canonical_host(&self, host: &str) -> String {
        if self.allow_www {
            return match host.strip_prefix(WWW_PREFIX) {
                Some(_) => host.to_string(),
                None => format!("{}{}", WWW_PREFIX, host),
            };
        }

        let mut bare = host;
        while let Some(rest) = bare.strip_prefix(WWW_PREFIX) {
            bare = rest;
        }
        bare.to_string()
    }

    /// Permits the origin of an already-normalized URL. Returns the stored
    /// key, or `None` when the URL has no host.
    pub fn allow(&mut self, url: &Url) -> Option<String> {
        let key = host_key(url)?;
        self.allowed.insert(key.clone());
        Some(key)
    }

    pub fn is_allowed(&self, key: &str) -> bool {
        self.allowed.contains(key)
    }

    pub fn allowed_count(&self) -> usize {
        self.allowed.len()
    }

    // Expects an already-normalized URL (see Frontier::normalize)
    pub fn check(&self, url: &Url) -> Result<(), IgnoreReason> {
        if url.scheme() != CRAWL_SCHEME {
            return Err(IgnoreReason::WrongScheme(url.scheme().to_string()));
        }

        match host_key(url) {
            Some(key) if self.is_allowed(&key) => Ok(()),
            _ => Err(IgnoreReason::ExternalDomain),
        }
    }
}

/// Allow-list key: the host plus an explicit port. The url crate drops
/// default ports, so `example.com:80` and `example.com` share a key while
/// `example.com:8080` does not.
pub fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|host| !host.is_empty())?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowing(allow_www: bool, host: &str) -> AdmissionPolicy {
        let mut policy = AdmissionPolicy::new(allow_www);
        policy.allow(&Url::parse(&format!("http://{}/", host)).unwrap());
        policy
    }

    #[test]
    fn test_strip_www_when_disallowed() {
        let policy = AdmissionPolicy::new(false);
        assert_eq!(policy.canonical_host("www.example.com"), "example.com");
        assert_eq!(policy.canonical_host("www.www.example.com"), "example.com");
        assert_eq!(policy.canonical_host("example.com"), "example.com");
    }

    #[test]
    fn test_prepend_www_when_allowed() {
        let policy = AdmissionPolicy::new(true);
        assert_eq!(policy.canonical_host("example.com"), "www.example.com");
        assert_eq!(policy.canonical_host("www.example.com"), "www.example.com");
    }

    #[test]
    fn test_canonicalization_is_idempotent() {
        for allow_www in [true, false] {
            let policy = AdmissionPolicy::new(allow_www);
            for host in ["example.com", "www.example.com", "www.www.example.com", "wwwexample.com"] {
                let once = policy.canonical_host(host);
                assert_eq!(policy.canonical_host(&once), once, "host {host}, www {allow_www}");
            }
        }
    }

    #[test]
    fn test_host_key_keeps_explicit_port() {
        let key = |raw: &str| host_key(&Url::parse(raw).unwrap());
        assert_eq!(key("http://example.com:8080/"), Some("example.com:8080".to_string()));
        assert_eq!(key("http://example.com:80/"), Some("example.com".to_string()));
        assert_eq!(key("mailto:someone@example.com"), None);
    }

    #[test]
    fn test_check_wrong_scheme() {
        let policy = allowing(false, "example.com");
        let url = Url::parse("https://example.com/x").unwrap();
        let reason = policy.check(&url).unwrap_err();
        assert_eq!(reason.to_string(), "wrong scheme: https");
    }

    #[test]
    fn test_check_external_domain() {
        let policy = allowing(false, "example.com");
        let url = Url::parse("http://other.com/").unwrap();
        assert_eq!(policy.check(&url), Err(IgnoreReason::ExternalDomain));
        assert_eq!(IgnoreReason::ExternalDomain.to_string(), "external domain");
    }

    #[test]
    fn test_check_other_port_is_external() {
        let policy = allowing(false, "example.com");
        let url = Url::parse("http://example.com:8080/admin").unwrap();
        assert_eq!(policy.check(&url), Err(IgnoreReason::ExternalDomain));
    }

    #[test]
    fn test_check_accepts_allowed_http() {
        let policy = allowing(false, "example.com");
        let url = Url::parse("http://example.com/about").unwrap();
        assert!(policy.check(&url).is_ok());
    }
}
