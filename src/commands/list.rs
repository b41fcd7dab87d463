//! List site content

use anyhow::Result;

use crate::store::DocumentStore;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let store = DocumentStore::load(site)?;

    match content_type {
        "post" | "posts" => {
            println!("Documents ({}):", store.len());
            for doc in store.documents() {
                println!(
                    "  {} - {} [{}]",
                    doc.date.format("%Y-%m-%d"),
                    doc.title,
                    doc.slug
                );
            }
        }
        "tag" | "tags" => {
            let tags = store.tags();
            println!("Tags ({}):", tags.len());
            for tag in tags {
                println!("  {} ({}) [{}]", tag.name, tag.count, tag.slug);
            }
        }
        "link" | "links" => {
            println!("Backlinks:");
            for doc in store.documents() {
                if doc.outgoing_links.is_empty() && doc.incoming_links.is_empty() {
                    continue;
                }
                println!("  {}", doc.slug);
                for link in &doc.outgoing_links {
                    println!("    -> {} ({})", link.slug, link.title);
                }
                for link in &doc.incoming_links {
                    println!("    <- {} ({})", link.slug, link.title);
                }
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, tag, link", content_type);
        }
    }

    Ok(())
}
