//! Search-result URL handling.

use reqwest::Url;

const DUCKDUCKGO_BASE: &str = "https://duckduckgo.com";

/// Canonical website for a search result.
///
/// Scheme-qualifies bare hosts with `https://`, lowercases the host, strips
/// `www.`, drops port, query and fragment, and trims trailing slashes.
/// Returns `None` when no host can be parsed.
#[must_use]
pub fn canonical_result_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lowered = trimmed.to_ascii_lowercase();
    let qualified = if lowered.starts_with("http://") || lowered.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&qualified).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    if host.is_empty() {
        return None;
    }

    let canonical = format!("{}://{}{}", parsed.scheme(), host, parsed.path());
    Some(canonical.trim_end_matches('/').to_string())
}

/// Unwrap a DuckDuckGo redirect link (`/l/?uddg=<target>`) to its target.
///
/// Anything that is not a redirect is returned unchanged.
#[must_use]
pub fn unwrap_search_redirect(raw: &str) -> String {
    let Ok(base) = Url::parse(DUCKDUCKGO_BASE) else {
        return raw.to_string();
    };
    let Ok(parsed) = base.join(raw.trim()) else {
        return raw.to_string();
    };

    parsed
        .query_pairs()
        .find(|(key, value)| (key == "uddg" || key == "uddg1") && !value.is_empty())
        .map_or_else(|| raw.to_string(), |(_, value)| value.into_owned())
}
