//! Text, slug, and website normalization shared by every pipeline stage.
//!
//! The dedup snapshot, the normalizer and the vendor-list builder all key on
//! these string-level forms.

/// Collapse runs of whitespace into a single space and trim both ends.
#[must_use]
pub fn normalize_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Generate a URL-safe slug: lowercase ASCII alphanumerics joined by `-`.
///
/// Non-ASCII text is transliterated first (`ü` → `u`). Whitespace, `-` and
/// `_` separate words; every other character is dropped.
#[must_use]
pub fn slugify(value: &str) -> String {
    deunicode::deunicode(value)
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Lowercase, scheme-qualify (`https://`) and strip trailing slashes.
///
/// Returns an empty string for blank input.
#[must_use]
pub fn normalize_website(value: &str) -> String {
    let text = normalize_text(value).to_lowercase();
    if text.is_empty() {
        return String::new();
    }
    let qualified = if text.starts_with("http://") || text.starts_with("https://") {
        text
    } else {
        format!("https://{text}")
    };
    qualified.trim_end_matches('/').to_string()
}

/// Strip the scheme from a website string, if present.
#[must_use]
pub fn strip_scheme(website: &str) -> &str {
    website
        .strip_prefix("https://")
        .or_else(|| website.strip_prefix("http://"))
        .unwrap_or(website)
}

/// Bare host of a website without `www.` or port, lowercased.
///
/// `https://www.Acme.io/contact` → `acme.io`.
#[must_use]
pub fn website_domain(website: &str) -> String {
    let lowered = website.trim().to_lowercase();
    let host = strip_scheme(&lowered)
        .split(['/', '?', '#'])
        .next()
        .unwrap_or("");
    let host = host.rsplit('@').next().unwrap_or(host);
    let host = host.split(':').next().unwrap_or(host);
    host.strip_prefix("www.").unwrap_or(host).to_string()
}
