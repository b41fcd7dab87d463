//! Configuration module

mod site;

pub use site::ExternalLinkConfig;
pub use site::FeedConfig;
pub use site::HighlightConfig;
pub use site::SiteConfig;
