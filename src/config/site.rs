//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    /// Absolute site URL, no trailing slash expected
    pub url: String,
    /// Path prefix under which documents are published, e.g. "/blog"
    pub base_path: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,

    // Rendering
    #[serde(default)]
    pub external: ExternalLinkConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Feeds
    #[serde(default)]
    pub feed: FeedConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "A Blog".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            base_path: "/blog".to_string(),

            content_dir: "content".to_string(),
            public_dir: "public".to_string(),

            external: ExternalLinkConfig::default(),
            highlight: HighlightConfig::default(),
            feed: FeedConfig::default(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// The posts path prefix with a guaranteed leading slash and no
    /// trailing slash, e.g. "/blog"
    pub fn posts_prefix(&self) -> String {
        let trimmed = self.base_path.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }
}

/// External link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalLinkConfig {
    /// Emit a decorative favicon attribute on external anchors
    pub favicons: bool,
    /// Tracking query parameter appended for allow-listed docs domains,
    /// e.g. "ref=myblog"
    pub tracking: Option<String>,
    /// Domains that receive the tracking parameter
    #[serde(default)]
    pub docs_domains: Vec<String>,
}

impl Default for ExternalLinkConfig {
    fn default() -> Self {
        Self {
            favicons: true,
            tracking: None,
            docs_domains: vec![
                "learn.microsoft.com".to_string(),
                "docs.microsoft.com".to_string(),
                "devblogs.microsoft.com".to_string(),
            ],
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Syntect theme used to pick token colors
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
        }
    }
}

/// Feed generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Maximum number of items in the RSS feed
    pub limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { limit: 20 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.base_path, "/blog");
        assert_eq!(config.feed.limit, 20);
        assert!(config.external.favicons);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
author: Test User
url: https://blog.example.org
base_path: /posts
feed:
  limit: 10
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.url, "https://blog.example.org");
        assert_eq!(config.posts_prefix(), "/posts");
        assert_eq!(config.feed.limit, 10);
    }

    #[test]
    fn test_posts_prefix_normalization() {
        let mut config = SiteConfig::default();
        config.base_path = "blog/".to_string();
        assert_eq!(config.posts_prefix(), "/blog");
        config.base_path = "/".to_string();
        assert_eq!(config.posts_prefix(), "");
    }
}
