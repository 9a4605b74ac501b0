//! Slug generation for image file names.

use unicode_normalization::UnicodeNormalization;

const SEPARATOR: char = '-';

/// Base name used when a product name contains nothing slug-worthy
pub const FALLBACK_SLUG: &str = "product";

/// Converts a human-readable name into a lowercase, hyphen-separated, ASCII-only slug.
///
/// Accented letters are reduced to their base letter, `_` becomes a separator,
/// `@` becomes `at`, other punctuation is dropped and runs of whitespace or
/// separators collapse into a single `-`. Returns an empty string when nothing
/// is left.
#[must_use]
pub fn slugify(name: &str) -> String {
    let ascii: String = name.nfkd().filter(char::is_ascii).collect();
    let ascii = ascii.replace('_', "-").replace('@', "-at-");

    let mut slug = String::with_capacity(ascii.len());
    let mut pending_separator = false;
    for c in ascii.chars().map(|c| c.to_ascii_lowercase()) {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push(SEPARATOR);
            }
            pending_separator = false;
            slug.push(c);
        } else if c == SEPARATOR || c.is_ascii_whitespace() {
            pending_separator = true;
        }
        // anything else is dropped without splitting words
    }
    slug
}

/// Like [`slugify`], but never empty.
#[must_use]
pub fn slugify_or_fallback(name: &str) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}
