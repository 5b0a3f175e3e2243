// src/config.rs
// =============================================================================
// The crawl configuration file.
//
// Example config.json:
//   {
//     "www": false,
//     "domains": ["example.com", "docs.example.com"]
//   }
//
// "www" decides the canonical host form: true means every host gets a
// "www." prefix, false means it is stripped. "allowWww" is accepted too.
// =============================================================================

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "www", alias = "allowWww", default)]
    pub allow_www: bool,
    pub domains: Vec<String>,
}

impl Config {
    /// Reads and validates a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        Self::from_json(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(raw).context("Config is not valid JSON")?;
        config.validated()
    }

    // Trims domains and rejects configs that could never crawl anything
    fn validated(mut self) -> Result<Self> {
        for domain in &mut self.domains {
            *domain = domain.trim().to_string();
        }

        if self.domains.is_empty() {
            bail!("Config lists no domains");
        }
        if self.domains.iter().any(|domain| domain.is_empty()) {
            bail!("Config contains an empty domain");
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_www_key() {
        let config = Config::from_json(r#"{"www": true, "domains": ["example.com"]}"#).unwrap();
        assert!(config.allow_www);
        assert_eq!(config.domains, vec!["example.com"]);
    }

    #[test]
    fn test_parse_allow_www_alias() {
        let config =
            Config::from_json(r#"{"allowWww": true, "domains": ["example.com"]}"#).unwrap();
        assert!(config.allow_www);
    }

    #[test]
    fn test_www_defaults_to_false() {
        let config = Config::from_json(r#"{"domains": [" example.com "]}"#).unwrap();
        assert!(!config.allow_www);
        assert_eq!(config.domains, vec!["example.com"]);
    }

    #[test]
    fn test_rejects_empty_domain_list() {
        assert!(Config::from_json(r#"{"www": false, "domains": []}"#).is_err());
    }

    #[test]
    fn test_rejects_blank_domain() {
        assert!(Config::from_json(r#"{"domains": ["example.com", "  "]}"#).is_err());
    }

    #[test]
    fn test_load_reports_missing_file() {
        let error = Config::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(error.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{"www": false, "domains": ["example.com"]}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.domains, vec!["example.com"]);
    }
}
