//! Content pipeline: frontmatter, markdown rendering, documents, backlinks

mod document;
mod frontmatter;
pub mod graph;
pub mod highlight;
pub mod loader;
pub mod markdown;

pub use document::{Document, LinkRef, Translation};
pub use frontmatter::{FrontMatter, RawTranslation};
pub use loader::ContentLoader;
pub use markdown::{render, PostRules, RenderOutput, RenderRules};

use std::path::PathBuf;
use thiserror::Error;

/// Failure classes of the content pipeline
#[derive(Debug, Error)]
pub enum ContentError {
    /// The file does not start with a `---` delimited frontmatter block
    #[error("missing frontmatter delimiter block")]
    MissingFrontmatter,

    /// The frontmatter block is not valid YAML
    #[error("invalid frontmatter: {0}")]
    InvalidFrontmatter(#[from] serde_yaml::Error),

    /// Two documents resolved to the same slug
    #[error("duplicate slug `{slug}` in {first:?} and {second:?}")]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
}
