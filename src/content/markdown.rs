//! Markdown rendering with injected rule overrides
//!
//! The event walk is a pure function of (markdown, rules): the four
//! custom rules (link, image, code block, heading) are a strategy
//! object passed in by the caller, and discovered outgoing references
//! come back as part of the return value instead of being accumulated
//! through shared state.

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;

use super::highlight::Highlighter;
use crate::config::SiteConfig;
use crate::helpers::html::html_escape;
use crate::helpers::slugify::slugify;
use crate::helpers::url::encode_path;

lazy_static! {
    static ref SOCIAL_POST_RE: Regex =
        Regex::new(r"^https://(www\.)?(twitter\.com|x\.com)/[^/]+/status/\d+")
            .expect("valid social post regex");
    static ref HEADING_ANCHOR_RE: Regex =
        Regex::new(r"\{([^\{\}]+)\}\s*$").expect("valid heading anchor regex");
}

/// Result of rendering one Markdown body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    /// Rendered HTML
    pub html: String,
    /// Slugs of other documents referenced by internal links, in
    /// discovery order; may contain duplicates and dangling references
    pub outgoing_slugs: Vec<String>,
}

/// Result of the link rule for a single anchor
#[derive(Debug, Clone)]
pub struct RenderedLink {
    pub html: String,
    /// Target slug when the link points at another document
    pub outgoing: Option<String>,
}

/// The four overridable rendering rules
pub trait RenderRules {
    fn link(&self, href: &str, title: &str, text: &str) -> RenderedLink;
    fn image(&self, src: &str, alt: &str, title: &str) -> String;
    fn code_block(&self, source: &str, info: &str) -> String;
    fn heading(&self, text: &str, level: u32) -> String;
}

/// A tag span being collected from the event stream. Inline markup
/// inside a captured span is flattened to its text.
enum Capture {
    Link {
        href: String,
        title: String,
        text: String,
    },
    Image {
        src: String,
        title: String,
        alt: String,
    },
    Heading {
        level: u32,
        text: String,
    },
    Code {
        info: String,
        source: String,
    },
}

impl Capture {
    fn push_text(&mut self, s: &str) {
        match self {
            Capture::Link { text, .. } => text.push_str(s),
            Capture::Image { alt, .. } => alt.push_str(s),
            Capture::Heading { text, .. } => text.push_str(s),
            Capture::Code { source, .. } => source.push_str(s),
        }
    }
}

/// Render a Markdown body to HTML using the given rule set
pub fn render<R: RenderRules>(markdown: &str, rules: &R) -> RenderOutput {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM;
    let parser = Parser::new_ext(markdown, options);

    let mut events: Vec<Event> = Vec::new();
    let mut outgoing_slugs: Vec<String> = Vec::new();
    let mut capture: Option<Capture> = None;

    for event in parser {
        if let Some(mut cap) = capture.take() {
            let mut finished = false;
            match event {
                Event::Text(t) => cap.push_text(&t),
                Event::Code(t) => cap.push_text(&t),
                Event::SoftBreak | Event::HardBreak => cap.push_text(" "),
                Event::End(TagEnd::Link) if matches!(cap, Capture::Link { .. }) => {
                    if let Capture::Link { href, title, text } = &cap {
                        let rendered = rules.link(href, title, text);
                        if let Some(slug) = rendered.outgoing {
                            outgoing_slugs.push(slug);
                        }
                        events.push(Event::Html(CowStr::from(rendered.html)));
                    }
                    finished = true;
                }
                Event::End(TagEnd::Image) if matches!(cap, Capture::Image { .. }) => {
                    if let Capture::Image { src, title, alt } = &cap {
                        events.push(Event::Html(CowStr::from(rules.image(src, alt, title))));
                    }
                    finished = true;
                }
                Event::End(TagEnd::Heading(_)) if matches!(cap, Capture::Heading { .. }) => {
                    if let Capture::Heading { level, text } = &cap {
                        events.push(Event::Html(CowStr::from(rules.heading(text, *level))));
                    }
                    finished = true;
                }
                Event::End(TagEnd::CodeBlock) if matches!(cap, Capture::Code { .. }) => {
                    if let Capture::Code { info, source } = &cap {
                        events.push(Event::Html(CowStr::from(rules.code_block(source, info))));
                    }
                    finished = true;
                }
                // Nested tags inside a captured span contribute only
                // their text events
                _ => {}
            }
            if !finished {
                capture = Some(cap);
            }
            continue;
        }

        match event {
            Event::Start(Tag::Link {
                dest_url, title, ..
            }) => {
                capture = Some(Capture::Link {
                    href: dest_url.to_string(),
                    title: title.to_string(),
                    text: String::new(),
                });
            }
            Event::Start(Tag::Image {
                dest_url, title, ..
            }) => {
                capture = Some(Capture::Image {
                    src: dest_url.to_string(),
                    title: title.to_string(),
                    alt: String::new(),
                });
            }
            Event::Start(Tag::Heading { level, .. }) => {
                capture = Some(Capture::Heading {
                    level: level as u32,
                    text: String::new(),
                });
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) => info.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                capture = Some(Capture::Code {
                    info,
                    source: String::new(),
                });
            }
            other => events.push(other),
        }
    }

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());

    RenderOutput {
        html: html_output,
        outgoing_slugs,
    }
}

/// Production rule set for blog documents
pub struct PostRules<'a> {
    pub config: &'a SiteConfig,
    pub highlighter: &'a Highlighter,
    /// Slug of the document being rendered, for self-link detection
    pub slug: &'a str,
    /// Document folder relative to the content root, forward slashes
    pub source_dir: &'a str,
}

impl<'a> PostRules<'a> {
    /// Derive the target slug of an internal href, skipping
    /// self-references, the listing page, and paths outside the posts
    /// prefix
    fn internal_slug(&self, href: &str) -> Option<String> {
        let prefix = self.config.posts_prefix();
        let path = href.split(['#', '?']).next().unwrap_or(href);
        let rest = path.strip_prefix(prefix.as_str())?;
        let slug = rest.trim_matches('/').split('/').next().unwrap_or("");

        if slug.is_empty() || slug == self.slug {
            return None;
        }
        Some(slug.to_string())
    }
}

impl<'a> RenderRules for PostRules<'a> {
    fn link(&self, href: &str, title: &str, text: &str) -> RenderedLink {
        // Bare social-post URLs become placeholder tokens picked up by
        // the embedding layer
        if text == href && SOCIAL_POST_RE.is_match(href) {
            return RenderedLink {
                html: format!("::{}::", href),
                outgoing: None,
            };
        }

        // Relative parent references point at sibling document folders
        let mut href = href.to_string();
        if href.starts_with("../") {
            let rest = href.trim_start_matches("../");
            href = format!("{}/{}", self.config.posts_prefix(), rest);
            if let Some(stripped) = href.strip_suffix("index.md") {
                href = stripped.trim_end_matches('/').to_string();
            }
        }

        let title_attr = if title.is_empty() {
            String::new()
        } else {
            format!(r#" title="{}""#, html_escape(title))
        };
        let text = html_escape(text);

        if href.starts_with('/') {
            let outgoing = self.internal_slug(&href);
            let html = format!(
                r#"<a href="{}"{} data-preload="hover" data-reload>{}</a>"#,
                href, title_attr, text
            );
            return RenderedLink { html, outgoing };
        }

        if href.starts_with("http://") || href.starts_with("https://") {
            let mut href = href;
            if let (Some(tracking), Some(host)) = (&self.config.external.tracking, host_of(&href))
            {
                if self.config.external.docs_domains.iter().any(|d| *d == host) {
                    let sep = if href.contains('?') { '&' } else { '?' };
                    href = format!("{}{}{}", href, sep, tracking);
                }
            }

            let favicon = if self.config.external.favicons {
                host_of(&href)
                    .map(|h| {
                        format!(
                            r#" data-favicon="https://icons.duckduckgo.com/ip3/{}.ico""#,
                            h
                        )
                    })
                    .unwrap_or_default()
            } else {
                String::new()
            };

            let html = format!(
                r#"<a href="{}"{} rel="external"{}>{}</a>"#,
                href, title_attr, favicon, text
            );
            return RenderedLink {
                html,
                outgoing: None,
            };
        }

        // Fragments and other relative hrefs pass through untouched
        RenderedLink {
            html: format!(r#"<a href="{}"{}>{}</a>"#, href, title_attr, text),
            outgoing: None,
        }
    }

    fn image(&self, src: &str, alt: &str, _title: &str) -> String {
        let src = if src.starts_with("http://") || src.starts_with("https://") {
            src.to_string()
        } else {
            let joined = normalize_path(&format!("{}/{}", self.source_dir, src));
            let webp = match joined.rsplit_once('.') {
                Some((stem, _ext)) => format!("{}.webp", stem),
                None => format!("{}.webp", joined),
            };
            encode_path(&format!("{}/{}", self.config.posts_prefix(), webp))
        };

        let alt_escaped = html_escape(alt);
        if alt.is_empty() {
            format!(r#"<figure><img src="{}" alt="" loading="lazy" /></figure>"#, src)
        } else {
            format!(
                r#"<figure><img src="{}" alt="{}" loading="lazy" /><figcaption>{}</figcaption></figure>"#,
                src, alt_escaped, alt_escaped
            )
        }
    }

    fn code_block(&self, source: &str, info: &str) -> String {
        self.highlighter.render(source, info)
    }

    fn heading(&self, text: &str, level: u32) -> String {
        let (visible, fragment) = match HEADING_ANCHOR_RE.captures(text) {
            Some(caps) => {
                let fragment = caps
                    .get(1)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default();
                let visible = HEADING_ANCHOR_RE.replace(text, "").trim_end().to_string();
                (visible, fragment)
            }
            None => (text.to_string(), slugify(text)),
        };

        if fragment.is_empty() {
            format!("<h{l}>{}</h{l}>", html_escape(&visible), l = level)
        } else {
            format!(
                r##"<h{l} id="{frag}"><a href="#{frag}">{text}</a></h{l}>"##,
                l = level,
                frag = fragment,
                text = html_escape(&visible)
            )
        }
    }
}

/// Extract the host part of an absolute URL
fn host_of(url: &str) -> Option<String> {
    let rest = url.split_once("://")?.1;
    let host = rest.split(['/', '?', '#']).next()?;
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

/// Normalize path separators and resolve `.`/`..` segments
fn normalize_path(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let mut stack: Vec<&str> = Vec::new();
    for segment in normalized.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }
    stack.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    fn test_rules<'a>(
        config: &'a SiteConfig,
        highlighter: &'a Highlighter,
    ) -> PostRules<'a> {
        PostRules {
            config,
            highlighter,
            slug: "current-post",
            source_dir: "blog/current-post",
        }
    }

    fn render_with(markdown: &str) -> RenderOutput {
        let config = SiteConfig::default();
        let highlighter = Highlighter::new("base16-ocean.dark");
        let rules = test_rules(&config, &highlighter);
        render(markdown, &rules)
    }

    #[test]
    fn test_internal_link_contributes_outgoing_slug() {
        let out = render_with("See [another post](/blog/foo).");
        assert_eq!(out.outgoing_slugs, vec!["foo"]);
        assert!(out.html.contains(r#"<a href="/blog/foo" data-preload="hover" data-reload>"#));
    }

    #[test]
    fn test_external_link_is_not_outgoing() {
        let out = render_with("See [example](https://example.com).");
        assert!(out.outgoing_slugs.is_empty());
        assert!(out.html.contains(r#"rel="external""#));
        assert!(out.html.contains("data-favicon"));
    }

    #[test]
    fn test_self_and_listing_links_skipped() {
        let out = render_with("[me](/blog/current-post) and [all posts](/blog)");
        assert!(out.outgoing_slugs.is_empty());
    }

    #[test]
    fn test_fragment_and_query_stripped_from_slug() {
        let out = render_with("[s](/blog/foo#section) [q](/blog/bar?x=1)");
        assert_eq!(out.outgoing_slugs, vec!["foo", "bar"]);
    }

    #[test]
    fn test_parent_directory_rewrite() {
        let out = render_with("[older](../older-post/index.md)");
        assert!(out.html.contains(r#"href="/blog/older-post""#));
        assert_eq!(out.outgoing_slugs, vec!["older-post"]);
    }

    #[test]
    fn test_social_post_placeholder() {
        let out = render_with("<https://twitter.com/someone/status/12345>");
        assert!(out.html.contains("::https://twitter.com/someone/status/12345::"));
        assert!(!out.html.contains("<a href=\"https://twitter.com"));
    }

    #[test]
    fn test_docs_domain_tracking_param() {
        let mut config = SiteConfig::default();
        config.external.tracking = Some("ref=myblog".to_string());
        let highlighter = Highlighter::new("base16-ocean.dark");
        let rules = test_rules(&config, &highlighter);
        let out = render("[docs](https://learn.microsoft.com/dotnet)", &rules);
        assert!(out.html.contains("https://learn.microsoft.com/dotnet?ref=myblog"));

        let out = render("[other](https://example.org/page)", &rules);
        assert!(!out.html.contains("ref=myblog"));
    }

    #[test]
    fn test_image_figure_and_webp_rewrite() {
        let out = render_with("![My diagram](./images/flow.png)");
        assert!(out
            .html
            .contains(r#"src="/blog/blog/current-post/images/flow.webp""#));
        assert!(out.html.contains("<figcaption>My diagram</figcaption>"));
    }

    #[test]
    fn test_absolute_image_passes_through() {
        let out = render_with("![remote](https://example.com/pic.png)");
        assert!(out.html.contains(r#"src="https://example.com/pic.png""#));
    }

    #[test]
    fn test_heading_self_link() {
        let out = render_with("## Some Title");
        assert!(out
            .html
            .contains(r##"<h2 id="some-title"><a href="#some-title">Some Title</a></h2>"##));
    }

    #[test]
    fn test_heading_anchor_override() {
        let out = render_with("## Some Title {custom-anchor}");
        assert!(out.html.contains(r#"id="custom-anchor""#));
        assert!(!out.html.contains("some-title"));
    }

    #[test]
    fn test_empty_heading_fragment_renders_bare() {
        let out = render_with("## !!!");
        assert!(out.html.contains("<h2>"));
        assert!(!out.html.contains("<a href=\"#"));
    }

    #[test]
    fn test_code_block_rendered_through_highlighter() {
        let out = render_with("```cs{2}:Program.cs\nvar a = 1;\nvar b = 2;\n```");
        assert!(out.html.contains(r#"class="highlight csharp""#));
        assert!(out.html.contains(r#"<span class="code-filename">Program.cs</span>"#));
        assert!(out.html.contains(r#"class="line highlighted""#));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let markdown = "# Title\n\nSome *text* with a [link](/blog/foo).\n\n```rust\nfn main() {}\n```\n";
        let first = render_with(markdown);
        let second = render_with(markdown);
        assert_eq!(first, second);
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("a/./b/../c"), "a/c");
        assert_eq!(normalize_path(r"a\b\c.png"), "a/b/c.png");
    }

    #[test]
    fn test_host_of() {
        assert_eq!(
            host_of("https://example.com/path?q=1"),
            Some("example.com".to_string())
        );
        assert_eq!(host_of("not a url"), None);
    }
}
