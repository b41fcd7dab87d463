//! Backlink graph computation
//!
//! Runs after every document has rendered individually: outgoing slug
//! lists are inverted into incoming links across the whole collection.
//! Dangling references (slugs that resolve to no document) are dropped,
//! and a document linking to another several times contributes a single
//! entry.

use std::collections::{HashMap, HashSet};

use super::{Document, LinkRef};

/// Fill in `outgoing_links` and `incoming_links` for every document.
/// Link lists follow collection order, which is date-descending.
pub fn link_documents(documents: &mut [Document]) {
    let titles: HashMap<String, String> = documents
        .iter()
        .map(|d| (d.slug.clone(), d.title.clone()))
        .collect();

    let outgoing_sets: Vec<HashSet<&str>> = documents
        .iter()
        .map(|d| d.outgoing_slugs.iter().map(String::as_str).collect())
        .collect();

    let mut outgoing: Vec<Vec<LinkRef>> = Vec::with_capacity(documents.len());
    let mut incoming: Vec<Vec<LinkRef>> = Vec::with_capacity(documents.len());

    for (i, doc) in documents.iter().enumerate() {
        let mut seen = HashSet::new();
        let out = documents
            .iter()
            .filter(|other| outgoing_sets[i].contains(other.slug.as_str()))
            .filter(|other| seen.insert(other.slug.clone()))
            .map(|other| LinkRef {
                slug: other.slug.clone(),
                title: titles[&other.slug].clone(),
            })
            .collect();

        let inc = documents
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .filter(|(j, _)| outgoing_sets[*j].contains(doc.slug.as_str()))
            .map(|(_, other)| LinkRef {
                slug: other.slug.clone(),
                title: other.title.clone(),
            })
            .collect();

        outgoing.push(out);
        incoming.push(inc);
    }

    for (doc, (out, inc)) in documents.iter_mut().zip(outgoing.into_iter().zip(incoming)) {
        doc.outgoing_links = out;
        doc.incoming_links = inc;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn doc(slug: &str, title: &str, outgoing: &[&str]) -> Document {
        Document {
            slug: slug.to_string(),
            title: title.to_string(),
            description: String::new(),
            date: Utc::now(),
            modified: None,
            tags: Vec::new(),
            html: String::new(),
            tldr: None,
            canonical: String::new(),
            banner: String::new(),
            translations: Vec::new(),
            outgoing_slugs: outgoing.iter().map(|s| s.to_string()).collect(),
            outgoing_links: Vec::new(),
            incoming_links: Vec::new(),
            source: String::new(),
            full_source: PathBuf::new(),
            extra: HashMap::new(),
        }
    }

    #[test]
    fn test_backlink_symmetry() {
        let mut docs = vec![
            doc("post-a", "Post A", &["post-b"]),
            doc("post-b", "Post B", &[]),
        ];
        link_documents(&mut docs);

        assert_eq!(
            docs[0].outgoing_links,
            vec![LinkRef {
                slug: "post-b".to_string(),
                title: "Post B".to_string()
            }]
        );
        assert!(docs[0].incoming_links.is_empty());
        assert_eq!(
            docs[1].incoming_links,
            vec![LinkRef {
                slug: "post-a".to_string(),
                title: "Post A".to_string()
            }]
        );
        assert!(docs[1].outgoing_links.is_empty());
    }

    #[test]
    fn test_duplicate_references_deduplicated() {
        let mut docs = vec![
            doc("a", "A", &["b", "b", "b"]),
            doc("b", "B", &[]),
        ];
        link_documents(&mut docs);
        assert_eq!(docs[0].outgoing_links.len(), 1);
        assert_eq!(docs[1].incoming_links.len(), 1);
    }

    #[test]
    fn test_dangling_references_dropped() {
        let mut docs = vec![doc("a", "A", &["nowhere"])];
        link_documents(&mut docs);
        assert!(docs[0].outgoing_links.is_empty());
    }

    #[test]
    fn test_link_lists_follow_collection_order() {
        let mut docs = vec![
            doc("newest", "Newest", &["older", "oldest"]),
            doc("older", "Older", &["newest"]),
            doc("oldest", "Oldest", &["newest"]),
        ];
        link_documents(&mut docs);

        let outgoing: Vec<&str> = docs[0]
            .outgoing_links
            .iter()
            .map(|l| l.slug.as_str())
            .collect();
        assert_eq!(outgoing, vec!["older", "oldest"]);

        let incoming: Vec<&str> = docs[0]
            .incoming_links
            .iter()
            .map(|l| l.slug.as_str())
            .collect();
        assert_eq!(incoming, vec!["older", "oldest"]);
    }
}
