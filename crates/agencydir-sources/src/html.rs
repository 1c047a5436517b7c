//! Regex-based extraction from candidate HTML pages.
//!
//! Each rule is a standalone function; [`extract_page_details`] combines
//! them for one fetched page.

use std::sync::LazyLock;

use agencydir_core::{VerificationSignals, WebsiteStatus};
use regex::Regex;

/// Paths whose links are followed for extra contact/about evidence.
pub const CONTACT_PATHS: [&str; 5] = ["/contact", "/contact-us", "/about", "/about-us", "/aboutus"];

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<title[^>]*>([^<]+)</title>").expect("valid regex"));
static META_DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+name=["']description["'][^>]+content=["']([^"']+)["']"#)
        .expect("valid regex")
});
static OG_DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+property=["']og:description["'][^>]+content=["']([^"']+)["']"#)
        .expect("valid regex")
});
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}").expect("valid regex")
});
static ANCHOR_HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a[^>]+href=["']([^"']+)["'][^>]*>"#).expect("valid regex")
});

static CONTACT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bcontact\b|reach us|get in touch|contact us|contact information")
        .expect("valid regex")
});
static ABOUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\babout\b|who we are|about us|our story").expect("valid regex"));
static AUTOMATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bautomation\b|zapier|make\.com|n8n|workflow|integration").expect("valid regex")
});
static SERVICES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bservices?\b|what we do|offerings|solutions?").expect("valid regex")
});
static WORK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bwork\b|portfolio|case study|projects?").expect("valid regex")
});
static SOCIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"linkedin\.com|facebook\.com|instagram\.com|x\.com|twitter\.com")
        .expect("valid regex")
});
static MAILTO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)mailto:").expect("valid regex"));

/// What one HTML page contributes to a candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageDetails {
    pub title: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub signals: VerificationSignals,
}

/// Replace tags with spaces and collapse whitespace.
#[must_use]
pub fn clean_text(value: &str) -> String {
    TAG_RE
        .replace_all(value, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode the five predefined XML entities.
#[must_use]
pub fn decode_entities(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Remove a wrapping `<![CDATA[ ... ]]>` section marker.
#[must_use]
pub fn strip_cdata(value: &str) -> &str {
    let value = value.strip_prefix("<![CDATA[").unwrap_or(value);
    value.strip_suffix("]]>").unwrap_or(value)
}

#[must_use]
pub fn extract_title(html: &str) -> Option<String> {
    TITLE_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| clean_text(&decode_entities(m.as_str())))
        .filter(|title| !title.is_empty())
}

/// `<meta name="description">`, falling back to `og:description`.
#[must_use]
pub fn extract_meta_description(html: &str) -> Option<String> {
    META_DESCRIPTION_RE
        .captures(html)
        .or_else(|| OG_DESCRIPTION_RE.captures(html))
        .and_then(|cap| cap.get(1))
        .map(|m| clean_text(&decode_entities(m.as_str())))
        .filter(|desc| !desc.is_empty())
}

/// Every e-mail address in the page, lowercased, deduped in order.
#[must_use]
pub fn extract_emails(html: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for m in EMAIL_RE.find_iter(html) {
        let email = m.as_str().to_lowercase();
        if !out.contains(&email) {
            out.push(email);
        }
    }
    out
}

/// Keyword signal flags.
///
/// `text` is the tag-stripped page text; `mailto` is checked against the raw
/// HTML since the links themselves are stripped from `text`. The returned
/// value has every status field left at its default.
#[must_use]
pub fn evaluate_text_signals(text: &str, html: &str) -> VerificationSignals {
    let normalized = text.to_lowercase();
    VerificationSignals {
        contact_signal: CONTACT_RE.is_match(&normalized),
        about_signal: ABOUT_RE.is_match(&normalized),
        automation_signal: AUTOMATION_RE.is_match(&normalized),
        services_signal: SERVICES_RE.is_match(&normalized),
        work_signal: WORK_RE.is_match(&normalized),
        social_signal: SOCIAL_RE.is_match(&normalized),
        mailto_signal: MAILTO_RE.is_match(html),
        ..VerificationSignals::default()
    }
}

/// Same-origin contact/about links found in anchors, at most `max_links`.
///
/// Fragments and trailing slashes are stripped; unparseable hrefs are skipped.
#[must_use]
pub fn collect_contact_links(base_url: &str, html: &str, max_links: usize) -> Vec<String> {
    let Ok(base) = reqwest::Url::parse(base_url) else {
        return Vec::new();
    };
    let origin = base.origin();

    let mut links: Vec<String> = Vec::new();
    for cap in ANCHOR_HREF_RE.captures_iter(html) {
        if links.len() >= max_links {
            break;
        }
        let href = cap.get(1).map_or("", |m| m.as_str());
        let raw = href.split('#').next().unwrap_or("").trim();
        if raw.is_empty() {
            continue;
        }
        let lower = raw.to_lowercase();
        if !CONTACT_PATHS.iter().any(|path| lower.contains(path)) {
            continue;
        }
        let Ok(target) = base.join(raw) else {
            continue;
        };
        if target.origin() != origin {
            continue;
        }
        let normalized = target.as_str().trim_end_matches('/').to_string();
        if !links.contains(&normalized) {
            links.push(normalized);
        }
    }
    links
}

/// Extract title, description, first e-mail and signals from a 2xx HTML page.
#[must_use]
pub fn extract_page_details(html: &str) -> PageDetails {
    let emails = extract_emails(html);
    let plain_text = clean_text(html);
    let flags = evaluate_text_signals(&plain_text, html);

    PageDetails {
        title: extract_title(html),
        description: extract_meta_description(html),
        email: emails.first().cloned(),
        signals: VerificationSignals {
            website_ok: true,
            website_status: WebsiteStatus::Ok,
            website_status_code: Some(200),
            email_from_source: !emails.is_empty(),
            ..flags
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_strips_tags_and_whitespace() {
        assert_eq!(
            clean_text("<p>Hello <b>automation</b>\n\n world</p>"),
            "Hello automation world"
        );
    }

    #[test]
    fn decode_entities_decodes_amp_last() {
        assert_eq!(decode_entities("a &amp;lt; b &lt; c"), "a &lt; b < c");
        assert_eq!(decode_entities("&quot;Flow&quot; &apos;n&#39;"), "\"Flow\" 'n'");
    }

    #[test]
    fn strip_cdata_removes_markers() {
        assert_eq!(strip_cdata("<![CDATA[Acme]]>"), "Acme");
        assert_eq!(strip_cdata("Acme"), "Acme");
    }

    #[test]
    fn extract_title_cleans_and_decodes() {
        let html = "<html><head><TITLE> Acme &amp; Co\n Automations </TITLE></head></html>";
        assert_eq!(extract_title(html).as_deref(), Some("Acme & Co Automations"));
        assert_eq!(extract_title("<title></title>"), None);
    }

    #[test]
    fn extract_meta_description_prefers_name_then_og() {
        let html = r#"<meta name="description" content="We automate workflows">
            <meta property="og:description" content="OG text">"#;
        assert_eq!(
            extract_meta_description(html).as_deref(),
            Some("We automate workflows")
        );

        let og_only = r#"<meta property='og:description' content='Zapier experts'>"#;
        assert_eq!(
            extract_meta_description(og_only).as_deref(),
            Some("Zapier experts")
        );
        assert_eq!(extract_meta_description("<p>nothing</p>"), None);
    }

    #[test]
    fn extract_emails_lowercases_and_dedupes() {
        let html = r#"<a href="mailto:Hello@Acme.io">Hello@Acme.io</a> or sales@acme.io"#;
        assert_eq!(extract_emails(html), vec!["hello@acme.io", "sales@acme.io"]);
    }

    #[test]
    fn evaluate_text_signals_matches_keywords() {
        let signals = evaluate_text_signals(
            "Get in touch about our Zapier workflow services and case study portfolio",
            r#"<a href="mailto:hi@acme.io">mail</a>"#,
        );
        assert!(signals.contact_signal);
        assert!(signals.about_signal);
        assert!(signals.automation_signal);
        assert!(signals.services_signal);
        assert!(signals.work_signal);
        assert!(!signals.social_signal);
        assert!(signals.mailto_signal);
        assert!(!signals.website_ok);
    }

    #[test]
    fn evaluate_text_signals_uses_word_boundaries() {
        let signals = evaluate_text_signals("contactless paywork", "");
        assert!(!signals.contact_signal);
        assert!(!signals.work_signal);
    }

    #[test]
    fn collect_contact_links_keeps_same_origin_allowed_paths() {
        let html = r##"
            <a href="/contact/">Contact</a>
            <a class="nav" href="https://acme.io/about-us#team">About</a>
            <a href="https://other.com/contact">Elsewhere</a>
            <a href="/pricing">Pricing</a>
            <a href="/contact">Duplicate</a>
        "##;
        let links = collect_contact_links("https://acme.io", html, 3);
        assert_eq!(
            links,
            vec!["https://acme.io/contact", "https://acme.io/about-us"]
        );
    }

    #[test]
    fn collect_contact_links_respects_cap() {
        let html = r#"<a href="/contact">a</a><a href="/about">b</a><a href="/aboutus">c</a>"#;
        assert_eq!(collect_contact_links("https://acme.io/", html, 2).len(), 2);
        assert!(collect_contact_links("not a url", html, 3).is_empty());
    }

    #[test]
    fn extract_page_details_marks_page_ok() {
        let html = r#"<html><head><title>Acme Automations</title>
            <meta name="description" content="Zapier automation agency"></head>
            <body>Contact us at ops@acme.io</body></html>"#;
        let details = extract_page_details(html);
        assert_eq!(details.title.as_deref(), Some("Acme Automations"));
        assert_eq!(details.email.as_deref(), Some("ops@acme.io"));
        assert!(details.signals.website_ok);
        assert_eq!(details.signals.website_status, WebsiteStatus::Ok);
        assert!(details.signals.contact_signal);
        assert!(details.signals.email_from_source);
    }
}
