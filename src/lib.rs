//! penna: a Markdown content pipeline for personal blogs
//!
//! This crate walks a directory of Markdown documents (one folder per
//! document), parses frontmatter, renders Markdown to HTML with custom
//! link/image/code/heading rules, computes the backlink graph between
//! documents and emits feed artifacts (RSS, sitemap).

pub mod commands;
pub mod config;
pub mod content;
pub mod feed;
pub mod helpers;
pub mod store;

use anyhow::Result;
use std::path::Path;

/// The main application context
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Content directory (one folder per document)
    pub content_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Site {
    /// Create a new Site instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        })
    }

    /// Build the site artifacts into the public directory
    pub fn build(&self) -> Result<()> {
        commands::build::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
