//! Feed artifacts: RSS and sitemap XML
//!
//! Both feeds are assembled as strings from the sorted document
//! collection; the store guarantees slug, title, description, dates and
//! HTML content are stable by the time they arrive here.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::SiteConfig;
use crate::content::Document;
use crate::helpers::url::full_url_for;

lazy_static! {
    static ref RELATIVE_URL_RE: Regex =
        Regex::new(r#"(href|src)="(/[^"]*)""#).expect("valid relative url regex");
}

/// Generate the RSS feed, newest documents first, capped at the
/// configured limit
pub fn rss(config: &SiteConfig, documents: &[Document]) -> String {
    let base_url = config.url.trim_end_matches('/');

    let mut feed = String::new();
    feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    feed.push('\n');
    feed.push_str(r#"<rss version="2.0">"#);
    feed.push('\n');
    feed.push_str("<channel>\n");
    feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
    feed.push_str(&format!("  <link>{}/</link>\n", base_url));
    feed.push_str(&format!(
        "  <description>{}</description>\n",
        escape_xml(&config.description)
    ));
    feed.push_str(&format!(
        "  <language>{}</language>\n",
        escape_xml(&config.language)
    ));
    feed.push_str(&format!(
        "  <lastBuildDate>{}</lastBuildDate>\n",
        chrono::Utc::now().format("%a, %d %b %Y %H:%M:%S GMT")
    ));

    for doc in documents.iter().take(config.feed.limit) {
        let content = convert_relative_urls_to_absolute(&doc.html, base_url);
        let content = strip_invalid_xml_chars(&content);

        feed.push_str("  <item>\n");
        feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&doc.title)));
        feed.push_str(&format!("    <link>{}</link>\n", doc.canonical));
        feed.push_str(&format!(
            "    <guid isPermaLink=\"true\">{}</guid>\n",
            doc.canonical
        ));
        feed.push_str(&format!(
            "    <pubDate>{}</pubDate>\n",
            doc.date.format("%a, %d %b %Y %H:%M:%S GMT")
        ));
        feed.push_str(&format!(
            "    <description>{}</description>\n",
            escape_xml(&content)
        ));
        feed.push_str("  </item>\n");
    }

    feed.push_str("</channel>\n</rss>\n");
    feed
}

/// Generate the sitemap: a few fixed top-level routes plus one entry
/// per document
pub fn sitemap(config: &SiteConfig, documents: &[Document]) -> String {
    let base_url = config.url.trim_end_matches('/');
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();

    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');

    push_url(&mut xml, &format!("{}/", base_url), &today, "daily", "1.0");
    push_url(
        &mut xml,
        &full_url_for(config, ""),
        &today,
        "daily",
        "1.0",
    );

    for doc in documents {
        let lastmod = doc
            .modified
            .unwrap_or(doc.date)
            .format("%Y-%m-%d")
            .to_string();
        push_url(&mut xml, &doc.canonical, &lastmod, "monthly", "0.8");
    }

    xml.push_str("</urlset>\n");
    xml
}

fn push_url(xml: &mut String, loc: &str, lastmod: &str, changefreq: &str, priority: &str) {
    xml.push_str("  <url>\n");
    xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(loc)));
    xml.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod));
    xml.push_str(&format!("    <changefreq>{}</changefreq>\n", changefreq));
    xml.push_str(&format!("    <priority>{}</priority>\n", priority));
    xml.push_str("  </url>\n");
}

/// Escape XML special characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Rewrite site-relative href/src attributes to absolute URLs so feed
/// readers resolve them
fn convert_relative_urls_to_absolute(html: &str, base_url: &str) -> String {
    RELATIVE_URL_RE
        .replace_all(html, |caps: &regex::Captures| {
            format!(r#"{}="{}{}""#, &caps[1], base_url, &caps[2])
        })
        .into_owned()
}

/// Drop control characters that are not valid in XML 1.0
fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            matches!(c, '\u{9}' | '\u{A}' | '\u{D}')
                || ('\u{20}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}
