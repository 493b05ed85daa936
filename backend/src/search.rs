//! Search-term handling for `GET /api/quotes/search`.

/// Upper bound on search results, whatever the caller asks for.
pub const MAX_RESULTS: u64 = 50;

const METACHARACTERS: &[char] = &[
    '.', '*', '+', '?', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\',
];

/// Prefixes every regular-expression metacharacter with a backslash so the
/// resulting pattern matches `text` literally.
pub fn escape_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if METACHARACTERS.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[derive(Debug, PartialEq, Eq)]
pub struct MissingSource;

/// Returns the `source` parameter exactly as given. Only an absent or empty value is
/// rejected; whitespace and over-long terms are searched like any other text.
pub fn source_term(raw: Option<&str>) -> Result<&str, MissingSource> {
    match raw {
        Some(term) if !term.is_empty() => Ok(term),
        _ => Err(MissingSource),
    }
}
