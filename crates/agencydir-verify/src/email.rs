use std::sync::LazyLock;

use agencydir_core::text::normalize_text;
use regex::Regex;

static EMAIL_SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}$")
        .expect("valid regex")
});

/// Strict e-mail shape check on the trimmed, lowercased address.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE_RE.is_match(&normalize_text(email).to_lowercase())
}

/// Everything after the last `@`, lowercased; empty when there is no `@`.
#[must_use]
pub fn email_domain(email: &str) -> String {
    let normalized = normalize_text(email).to_lowercase();
    normalized
        .rfind('@')
        .map(|at| normalized[at + 1..].to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_addresses() {
        assert!(is_valid_email("ops@acme.io"));
        assert!(is_valid_email("  First.Last+tag@mail.Example.co.uk "));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("ops@acme"));
        assert!(!is_valid_email("ops at acme.io"));
        assert!(!is_valid_email("@acme.io"));
        assert!(!is_valid_email("ops@acme.i"));
    }

    #[test]
    fn domain_is_after_last_at() {
        assert_eq!(email_domain("Ops@Acme.IO"), "acme.io");
        assert_eq!(email_domain("weird@name@flow.ai"), "flow.ai");
        assert_eq!(email_domain("no-at-sign"), "");
    }
}
