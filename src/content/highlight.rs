//! Code block rendering with syntax highlighting
//!
//! Fenced code blocks carry an info string of the form
//! `lang{ranges}:filename`, e.g. `cs{2,5-7}:Program.cs`. The block is
//! rendered line by line so individual lines can be highlighted or
//! dimmed, with token colors mapped to CSS custom properties so the
//! page can swap themes without re-rendering.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::helpers::html::html_escape;

lazy_static! {
    static ref INFO_RE: Regex =
        Regex::new(r"^([^\{:]*)(?:\{([^\}]*)\})?(?::(.*))?$").expect("valid info regex");
}

/// Short language codes mapped to the names syntect knows
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("cs", "csharp"),
    ("yml", "yaml"),
    ("ts", "typescript"),
    ("js", "javascript"),
    ("sh", "bash"),
];

/// Parsed code fence info string
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeInfo {
    /// Resolved language identifier, aliases already applied
    pub language: Option<String>,
    /// 1-based line numbers to highlight
    pub highlights: BTreeSet<usize>,
    /// Filename annotation shown in the header bar
    pub filename: Option<String>,
}

/// Parse an info string like `cs{2,5-7}:Program.cs`
pub fn parse_info(info: &str) -> CodeInfo {
    let info = info.trim();
    let Some(caps) = INFO_RE.captures(info) else {
        return CodeInfo::default();
    };

    let language = caps
        .get(1)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(resolve_language);

    let highlights = caps
        .get(2)
        .map(|m| expand_ranges(m.as_str()))
        .unwrap_or_default();

    let filename = caps
        .get(3)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty());

    CodeInfo {
        language,
        highlights,
        filename,
    }
}

/// Expand a comma-separated range spec like `3,5-7` into the explicit
/// set of 1-based line numbers
pub fn expand_ranges(spec: &str) -> BTreeSet<usize> {
    let mut lines = BTreeSet::new();

    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            let start = start.trim().parse::<usize>();
            let end = end.trim().parse::<usize>();
            if let (Ok(start), Ok(end)) = (start, end) {
                for n in start..=end {
                    lines.insert(n);
                }
            }
        } else if let Ok(n) = part.parse::<usize>() {
            lines.insert(n);
        }
    }

    lines
}

/// Apply manual aliases before asking syntect
fn resolve_language(lang: &str) -> String {
    let lower = lang.to_lowercase();
    for (alias, canonical) in LANGUAGE_ALIASES {
        if lower == *alias {
            return (*canonical).to_string();
        }
    }
    lower
}

/// Content-derived identifier for a code block, used as the DOM anchor
/// and the copy-button target
pub fn content_id(code: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    code.hash(&mut hasher);
    format!("code-{:x}", hasher.finish())
}

/// Syntax highlighter shared across a build
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    /// Create a highlighter using the named syntect theme
    pub fn new(theme_name: &str) -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let mut theme_set = ThemeSet::load_defaults();

        let theme = theme_set
            .themes
            .remove(theme_name)
            .or_else(|| {
                let fallback = theme_set.themes.keys().next().cloned()?;
                theme_set.themes.remove(&fallback)
            })
            .expect("syntect default themes are never empty");

        Self { syntax_set, theme }
    }

    /// Render a fenced code block into the full figure HTML
    pub fn render(&self, code: &str, info: &str) -> String {
        let info = parse_info(info);
        let id = content_id(code);
        let lang = info.language.as_deref().unwrap_or("text");

        let lines = self.render_lines(code, lang, &info.highlights);

        let mut header = String::new();
        header.push_str(&format!(
            r#"<div class="code-header"><span class="code-lang-icon {}"></span>"#,
            lang
        ));
        if let Some(filename) = &info.filename {
            header.push_str(&format!(
                r#"<span class="code-filename">{}</span>"#,
                html_escape(filename)
            ));
        }
        header.push_str(&format!(
            r##"<button class="code-copy" data-target="#{}">Copy</button></div>"##,
            id
        ));

        format!(
            r#"<figure class="highlight {}" id="{}">{}<pre><code>{}</code></pre></figure>"#,
            lang, id, header, lines
        )
    }

    /// Render each line as its own block element, tokenized when a
    /// syntax is known, plain-escaped otherwise
    fn render_lines(&self, code: &str, lang: &str, highlights: &BTreeSet<usize>) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_token(syntect_token(lang)))
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang));

        let mut highlighter = syntax.map(|s| HighlightLines::new(s, &self.theme));
        let mut out = String::new();

        for (i, line) in LinesWithEndings::from(code).enumerate() {
            let number = i + 1;
            let class = line_class(number, highlights);
            let text = line.trim_end_matches(['\n', '\r']);

            if text.trim().is_empty() {
                out.push_str(&format!(r#"<div class="{}">&nbsp;</div>"#, class));
                // Keep the tokenizer state in sync across blank lines
                if let Some(h) = highlighter.as_mut() {
                    let _ = h.highlight_line(line, &self.syntax_set);
                }
                continue;
            }

            let spans = match highlighter.as_mut() {
                Some(h) => match h.highlight_line(line, &self.syntax_set) {
                    Ok(ranges) => ranges
                        .iter()
                        .map(|(style, token)| {
                            let c = style.foreground;
                            format!(
                                r#"<span style="color: var(--c-{:02X}{:02X}{:02X})">{}</span>"#,
                                c.r,
                                c.g,
                                c.b,
                                html_escape(token.trim_end_matches(['\n', '\r']))
                            )
                        })
                        .collect::<String>(),
                    Err(_) => html_escape(text),
                },
                None => html_escape(text),
            };

            out.push_str(&format!(r#"<div class="{}">{}</div>"#, class, spans));
        }

        out
    }
}

/// Canonical language names mapped back to the tokens syntect indexes
fn syntect_token(lang: &str) -> &str {
    match lang {
        "csharp" => "cs",
        other => other,
    }
}

fn line_class(number: usize, highlights: &BTreeSet<usize>) -> String {
    if highlights.contains(&number) {
        "line highlighted".to_string()
    } else if !highlights.is_empty() {
        "line dim".to_string()
    } else {
        "line".to_string()
    }
}
