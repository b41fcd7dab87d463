//! Front-matter parsing and metadata normalization

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use super::ContentError;

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// A translated version of a document hosted elsewhere
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawTranslation {
    pub url: String,
    pub author: String,
    #[serde(default)]
    pub profile: String,
    pub language: String,
}

/// Front-matter data from a document
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub date: Option<String>,
    pub modified: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub translations: Vec<RawTranslation>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string.
    /// Returns (front_matter, remaining_content).
    ///
    /// Unlike a general-purpose loader this is strict: a document without
    /// a complete `---` delimited header block is an authoring error and
    /// fails the build for that file.
    pub fn parse(content: &str) -> Result<(Self, &str), ContentError> {
        let content = content.trim_start();

        let rest = content
            .strip_prefix("---")
            .ok_or(ContentError::MissingFrontmatter)?;
        let rest = rest.trim_start_matches(['\n', '\r']);

        let end_pos = rest.find("\n---").ok_or(ContentError::MissingFrontmatter)?;
        let yaml_content = &rest[..end_pos];
        let remaining = &rest[end_pos + 4..];
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        let mut fm: FrontMatter = serde_yaml::from_str(yaml_content)?;
        fm.tags = normalize_tags(&fm.tags);
        Ok((fm, remaining))
    }

    /// Parse the date string into a DateTime
    pub fn parse_date(&self) -> Option<DateTime<Utc>> {
        self.date.as_ref().and_then(|s| parse_date_string(s))
    }

    /// Parse the modified date string into a DateTime
    pub fn parse_modified(&self) -> Option<DateTime<Utc>> {
        self.modified.as_ref().and_then(|s| parse_date_string(s))
    }
}

/// Fixed alias corrections applied to tags, matched case-insensitively
const TAG_ALIASES: &[(&str, &str)] = &[
    ("typescript", "TypeScript"),
    ("javascript", "JavaScript"),
    ("ngrx", "NgRx"),
    ("rxjs", "RxJS"),
    ("dotnet", ".NET"),
    (".net", ".NET"),
];

/// Normalize a tag list: split comma-delimited entries, trim, title-case,
/// and apply the fixed alias corrections.
pub fn normalize_tags(raw: &[String]) -> Vec<String> {
    raw.iter()
        .flat_map(|entry| entry.split(','))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(normalize_tag)
        .collect()
}

fn normalize_tag(tag: &str) -> String {
    let lower = tag.to_lowercase();
    for (alias, canonical) in TAG_ALIASES {
        if lower == *alias {
            return (*canonical).to_string();
        }
    }
    title_case(tag)
}

/// Uppercase the first letter, leave the rest as written
fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Expand a language code into its display name
pub fn language_display_name(code: &str) -> String {
    match code {
        "es" => "Español".to_string(),
        other => other.to_string(),
    }
}

/// Parse a date string in various formats, normalized to UTC
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(DateTime::from_naive_utc_and_offset(dt, Utc));
        }
        if let Ok(d) = chrono::NaiveDate::parse_from_str(s, fmt) {
            let dt = d.and_hms_opt(0, 0, 0)?;
            return Some(DateTime::from_naive_utc_and_offset(dt, Utc));
        }
    }

    // Try RFC 3339 / ISO 8601
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    None
}
