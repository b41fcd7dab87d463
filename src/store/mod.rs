//! Document store
//!
//! The store owns the fully processed collection for the lifetime of
//! the process. It is populated exactly once by an explicit `load`
//! call from the top-level context, so there is no lazily-populated
//! global and no first-access race to reason about.

use anyhow::Result;
use indexmap::IndexMap;

use crate::content::{ContentLoader, Document};
use crate::Site;

/// A tag with its slug and usage count
#[derive(Debug, Clone)]
pub struct TagCount {
    pub name: String,
    pub slug: String,
    pub count: usize,
}

/// The in-memory document collection, sorted by publish date descending
#[derive(Debug)]
pub struct DocumentStore {
    documents: Vec<Document>,
    index: IndexMap<String, usize>,
}

impl DocumentStore {
    /// Walk the content directory and build the full collection:
    /// parse, render, backlink graph, sort
    pub fn load(site: &Site) -> Result<Self> {
        let documents = ContentLoader::new(site).load_documents()?;

        let index = documents
            .iter()
            .enumerate()
            .map(|(i, d)| (d.slug.clone(), i))
            .collect();

        Ok(Self { documents, index })
    }

    /// All documents, newest first
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Look up a document by slug
    pub fn get(&self, slug: &str) -> Option<&Document> {
        self.index.get(slug).map(|&i| &self.documents[i])
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Tag usage across the collection, most used first
    pub fn tags(&self) -> Vec<TagCount> {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for doc in &self.documents {
            for tag in &doc.tags {
                *counts.entry(tag.clone()).or_insert(0) += 1;
            }
        }

        let mut tags: Vec<TagCount> = counts
            .into_iter()
            .map(|(name, count)| TagCount {
                slug: slug::slugify(&name),
                name,
                count,
            })
            .collect();
        tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        tags
    }
}
