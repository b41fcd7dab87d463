//! Slug generation for document identities and heading anchors

/// Translation table for accented characters that appear in post titles
/// and headings. Folded before the alphanumeric filter so that e.g.
/// "Café" becomes "cafe" and not "caf".
const ACCENTS: &[(char, &str)] = &[
    ('à', "a"),
    ('á', "a"),
    ('â', "a"),
    ('ã', "a"),
    ('ä', "a"),
    ('å', "a"),
    ('æ', "ae"),
    ('ç', "c"),
    ('è', "e"),
    ('é', "e"),
    ('ê', "e"),
    ('ë', "e"),
    ('ì', "i"),
    ('í', "i"),
    ('î', "i"),
    ('ï', "i"),
    ('ñ', "n"),
    ('ò', "o"),
    ('ó', "o"),
    ('ô', "o"),
    ('õ', "o"),
    ('ö', "o"),
    ('ø', "o"),
    ('ù', "u"),
    ('ú', "u"),
    ('û', "u"),
    ('ü', "u"),
    ('ý', "y"),
    ('ÿ', "y"),
    ('ß', "ss"),
];

/// Turn arbitrary text into a URL-safe slug: lowercase, diacritics folded
/// through the translation table, every other non-alphanumeric run
/// collapsed to a single hyphen, no leading or trailing hyphen.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.to_lowercase().chars() {
        let folded = ACCENTS
            .iter()
            .find(|(accent, _)| *accent == c)
            .map(|(_, plain)| *plain);

        match folded {
            Some(plain) => {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push_str(plain);
            }
            None if c.is_ascii_alphanumeric() => {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(c);
            }
            None => pending_hyphen = true,
        }
    }

    slug
}
