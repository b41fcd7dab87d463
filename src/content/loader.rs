//! Content loader - discovers and parses document folders
//!
//! Every folder under the content directory that contains an `index.md`
//! is one logical document; a sibling `tldr.md` provides the optional
//! short-form variant.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::highlight::Highlighter;
use super::{graph, markdown, ContentError, Document, FrontMatter, PostRules, Translation};
use crate::helpers::html::{strip_html, truncate};
use crate::helpers::slugify::slugify;
use crate::helpers::url::full_url_for;
use crate::Site;

/// Loads documents from the content directory
pub struct ContentLoader<'a> {
    site: &'a Site,
    highlighter: Highlighter,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        let highlighter = Highlighter::new(&site.config.highlight.theme);
        Self { site, highlighter }
    }

    /// Load all documents, compute the backlink graph, and return the
    /// collection sorted by publish date descending (slug ascending on
    /// ties, for reproducible output)
    pub fn load_documents(&self) -> Result<Vec<Document>> {
        if !self.site.content_dir.exists() {
            return Ok(Vec::new());
        }

        let mut folders: Vec<PathBuf> = WalkDir::new(&self.site.content_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file() && e.file_name() == "index.md")
            .filter_map(|e| e.path().parent().map(Path::to_path_buf))
            .collect();
        folders.sort();

        let mut documents = Vec::with_capacity(folders.len());
        for folder in folders {
            let document = self
                .load_document(&folder)
                .with_context(|| format!("failed to load document in {:?}", folder))?;
            documents.push(document);
        }

        // Duplicate slugs would corrupt the backlink graph, so the
        // build fails rather than letting the last document win
        for (i, doc) in documents.iter().enumerate() {
            if let Some(other) = documents[..i].iter().find(|d| d.slug == doc.slug) {
                return Err(ContentError::DuplicateSlug {
                    slug: doc.slug.clone(),
                    first: other.full_source.clone(),
                    second: doc.full_source.clone(),
                }
                .into());
            }
        }

        documents.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));

        graph::link_documents(&mut documents);

        tracing::info!("Loaded {} documents", documents.len());
        Ok(documents)
    }

    /// Load a single document folder
    fn load_document(&self, folder: &Path) -> Result<Document> {
        let main_path = folder.join("index.md");
        let content = fs::read_to_string(&main_path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        let source = folder
            .strip_prefix(&self.site.content_dir)
            .unwrap_or(folder)
            .to_string_lossy()
            .replace('\\', "/");

        let folder_name = folder
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();

        let title = fm.title.clone().unwrap_or_else(|| folder_name.clone());

        let slug = fm
            .slug
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| Some(slugify(&title)).filter(|s| !s.is_empty()))
            .unwrap_or_else(|| slugify(&folder_name));

        let rules = PostRules {
            config: &self.site.config,
            highlighter: &self.highlighter,
            slug: &slug,
            source_dir: &source,
        };

        let rendered = markdown::render(body, &rules);
        let mut outgoing_slugs = rendered.outgoing_slugs;

        // Short-form variant: absent, not empty, when there is no file
        let tldr_path = folder.join("tldr.md");
        let tldr = if tldr_path.exists() {
            let tldr_source = fs::read_to_string(&tldr_path)?;
            let tldr_rendered = markdown::render(&tldr_source, &rules);
            outgoing_slugs.extend(tldr_rendered.outgoing_slugs);
            Some(tldr_rendered.html)
        } else {
            None
        };

        let file_modified = fs::metadata(&main_path)
            .ok()
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Utc>::from);

        let date = fm
            .parse_date()
            .or(file_modified)
            .unwrap_or_else(Utc::now);
        let modified = fm.parse_modified().or(file_modified);

        let description = fm.description.clone().unwrap_or_else(|| {
            truncate(strip_html(&rendered.html).trim(), 200, None)
        });

        let translations = fm
            .translations
            .iter()
            .map(|t| Translation {
                url: t.url.clone(),
                author: t.author.clone(),
                profile: t.profile.clone(),
                language: super::frontmatter::language_display_name(&t.language),
            })
            .collect();

        let canonical = full_url_for(&self.site.config, &slug);
        let banner = format!(
            "{}/banners/{}.webp",
            self.site.config.url.trim_end_matches('/'),
            slug
        );

        Ok(Document {
            slug,
            title,
            description,
            date,
            modified,
            tags: fm.tags.clone(),
            html: rendered.html,
            tldr,
            canonical,
            banner,
            translations,
            outgoing_slugs,
            outgoing_links: Vec::new(),
            incoming_links: Vec::new(),
            source,
            full_source: main_path,
            extra: fm.extra,
        })
    }
}
