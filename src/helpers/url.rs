//! URL helper functions

use crate::config::SiteConfig;

/// Generate a site-relative URL under the configured base path
///
/// # Examples
/// ```ignore
/// url_for(&config, "my-post") // -> "/blog/my-post"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let prefix = config.posts_prefix();
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        if prefix.is_empty() {
            "/".to_string()
        } else {
            prefix
        }
    } else {
        format!("{}/{}", prefix, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "my-post") // -> "https://example.com/blog/my-post"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Percent-encode a URL path, leaving slashes intact
pub fn encode_path(path: &str) -> String {
    use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

    // Characters that need escaping inside a path segment
    const PATH: &AsciiSet = &CONTROLS
        .add(b' ')
        .add(b'"')
        .add(b'<')
        .add(b'>')
        .add(b'`')
        .add(b'?')
        .add(b'#');

    utf8_percent_encode(path, PATH).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com".to_string();
        config.base_path = "/blog".to_string();
        config
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "my-post"), "/blog/my-post");
        assert_eq!(url_for(&config, "/my-post"), "/blog/my-post");
        assert_eq!(url_for(&config, ""), "/blog");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "my-post"),
            "https://example.com/blog/my-post"
        );
    }

    #[test]
    fn test_encode_path() {
        assert_eq!(
            encode_path("/blog/my-post/some image.webp"),
            "/blog/my-post/some%20image.webp"
        );
    }
}
