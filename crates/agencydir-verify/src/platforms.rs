use agencydir_core::text::normalize_text;

/// Platform tokens recognised in candidate and query text.
pub const PLATFORM_VOCABULARY: [&str; 6] = ["zapier", "make", "n8n", "automation", "ai", "custom"];

const AUTOMATION_HINTS: [&str; 7] = [
    "automation",
    "zapier",
    "make",
    "n8n",
    "workflow",
    "integration",
    "agency",
];

/// Vocabulary tokens found as substrings of `seeds` plus `text`, in
/// vocabulary order.
#[must_use]
pub fn extract_platforms(text: &str, seeds: &[String]) -> Vec<String> {
    let mut source = seeds
        .iter()
        .map(|s| s.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    source.push(' ');
    source.push_str(&normalize_text(text).to_lowercase());

    let mut found: Vec<String> = PLATFORM_VOCABULARY
        .iter()
        .filter(|token| source.contains(*token))
        .map(|token| (*token).to_string())
        .collect();
    if found.is_empty() && source.contains("zapier") {
        found.push("zapier".to_string());
    }
    found
}

/// `true` when the text mentions an automation-related token.
#[must_use]
pub fn has_automation_hint(text: &str) -> bool {
    let normalized = normalize_text(text).to_lowercase();
    AUTOMATION_HINTS.iter().any(|token| normalized.contains(token))
}
