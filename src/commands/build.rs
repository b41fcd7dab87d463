//! Build the site artifacts into the public directory

use anyhow::{Context, Result};
use std::fs;

use crate::feed;
use crate::store::DocumentStore;
use crate::Site;

/// Load the document collection and write all build artifacts:
/// per-document HTML fragments, the document dump, RSS and sitemap
pub fn run(site: &Site) -> Result<()> {
    let store = DocumentStore::load(site)?;

    fs::create_dir_all(&site.public_dir)?;

    let posts_dir = site
        .public_dir
        .join(site.config.posts_prefix().trim_start_matches('/'));

    for doc in store.documents() {
        let doc_dir = posts_dir.join(&doc.slug);
        fs::create_dir_all(&doc_dir)
            .with_context(|| format!("failed to create {:?}", doc_dir))?;
        fs::write(doc_dir.join("index.html"), &doc.html)?;

        if let Some(tldr) = &doc.tldr {
            fs::write(doc_dir.join("tldr.html"), tldr)?;
        }
    }

    let dump = serde_json::to_string_pretty(store.documents())?;
    fs::write(site.public_dir.join("documents.json"), dump)?;

    fs::write(
        site.public_dir.join("rss.xml"),
        feed::rss(&site.config, store.documents()),
    )?;
    fs::write(
        site.public_dir.join("sitemap.xml"),
        feed::sitemap(&site.config, store.documents()),
    )?;

    tracing::info!(
        "Built {} documents into {:?}",
        store.len(),
        site.public_dir
    );
    Ok(())
}
