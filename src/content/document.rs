//! Document model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// A reference between two documents, derived from rendered links
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkRef {
    pub slug: String,
    pub title: String,
}

/// A translated version of a document, with the language code expanded
/// to its display name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Translation {
    pub url: String,
    pub author: String,
    pub profile: String,
    pub language: String,
}

/// One rendered content item (blog post or short-form note)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique slug, the document's identity
    pub slug: String,

    /// Document title
    pub title: String,

    /// Short description used in feeds and metadata
    pub description: String,

    /// Publication date
    pub date: DateTime<Utc>,

    /// Last-modified date, when available
    pub modified: Option<DateTime<Utc>>,

    /// Ordered, normalized tags
    pub tags: Vec<String>,

    /// Rendered HTML body
    pub html: String,

    /// Optional short-form ("TLDR") HTML variant; absent when the
    /// document folder has no tldr.md
    pub tldr: Option<String>,

    /// Canonical URL of the document
    pub canonical: String,

    /// Banner image URL
    pub banner: String,

    /// Translations hosted elsewhere
    pub translations: Vec<Translation>,

    /// Slugs discovered in this document's rendered links (raw, may
    /// contain duplicates and dangling references)
    #[serde(skip)]
    pub outgoing_slugs: Vec<String>,

    /// Outgoing links to other documents in the set
    pub outgoing_links: Vec<LinkRef>,

    /// Incoming links from other documents in the set
    pub incoming_links: Vec<LinkRef>,

    /// Source folder, relative to the content directory
    pub source: String,

    /// Full path of the main source file
    #[serde(skip)]
    pub full_source: PathBuf,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}
