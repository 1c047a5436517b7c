//! Directory, aggregator and social-site blocklist for discovered results.

use std::sync::LazyLock;

use agencydir_core::{CandidateRaw, DiscoveryFlags};
use regex::Regex;

pub const DIRECTORY_DOMAINS: [&str; 16] = [
    "clutch.co",
    "goodfirms.com",
    "sortlist.com",
    "fiverr.com",
    "upwork.com",
    "trustpilot.com",
    "g2.com",
    "capterra.com",
    "softwareadvice.com",
    "yelp.com",
    "yellowpages.com",
    "agencyspotter.com",
    "agencyanalytics.com",
    "agencycentral.com",
    "agencylist.co",
    "freelancer.com",
];

pub const NON_AGENCY_HOSTS: [&str; 30] = [
    "facebook.com",
    "twitter.com",
    "x.com",
    "instagram.com",
    "reddit.com",
    "quora.com",
    "stacker.news",
    "stackoverflow.com",
    "github.com",
    "gitlab.com",
    "discord.com",
    "wikipedia.org",
    "namu.wiki",
    "tistory.com",
    "magicaiprompts.com",
    "infograb.net",
    "aeiai.net",
    "medium.com",
    "zhihu.com",
    "youtube.com",
    "twitch.tv",
    "bilibili.com",
    "facebook.net",
    "wix.com",
    "wordpress.com",
    "wordpress.org",
    "blogspot.com",
    "soundcloud.com",
    "dribbble.com",
    "linkedin.com",
];

pub const DIRECTORY_PATH_HINTS: [&str; 29] = [
    "/directory",
    "/directories",
    "/listing",
    "/listings",
    "/find-a",
    "/find-an",
    "/marketplace",
    "/vendors",
    "/agency",
    "/question",
    "/questions",
    "/answers",
    "/forum",
    "/community",
    "/user",
    "/users",
    "/wiki",
    "/blog",
    "/docs",
    "/documentation",
    "/help",
    "/tutorial",
    "/tutorials",
    "/guide",
    "/guides",
    "/post",
    "/posts",
    "/tags",
    "/tag/",
];

pub const DIRECTORY_TEXT_HINTS: [&str; 26] = [
    "directory",
    "directory of",
    "list of",
    "best",
    "reviews",
    "reviewed",
    "top",
    "listing",
    "marketplace",
    "compare",
    "service directory",
    "directory listing",
    "question",
    "answers",
    "forum",
    "community",
    "review",
    "wiki",
    "blog",
    "tutorial",
    "guide",
    "documentation",
    "documentation page",
    "technical documentation",
    "questions",
    "profile",
];

static DOCS_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bdocs?\b").expect("valid regex"));
static GUIDE_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bguide\b|\btutorial\b|\breference\b").expect("valid regex"));

/// Result of checking one candidate against the blocklist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryCheck {
    pub blocked: bool,
    pub reasons: Vec<String>,
}

/// Bare lowercase host of a URL-ish string, without `www.`.
#[must_use]
pub fn host_for_filter(input: &str) -> String {
    let value = input.trim().to_lowercase();
    if let Ok(parsed) = reqwest::Url::parse(&value) {
        if let Some(host) = parsed.host_str() {
            return host.strip_prefix("www.").unwrap_or(host).to_string();
        }
    }
    let without_scheme = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .unwrap_or(&value);
    let host = without_scheme.split(['/', '?']).next().unwrap_or("");
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

fn matches_domain(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}

/// `true` for directory, aggregator and social/content hosts and their subdomains.
#[must_use]
pub fn is_known_directory_host(host: &str) -> bool {
    let host = host_for_filter(host);
    if host.is_empty() {
        return false;
    }
    DIRECTORY_DOMAINS
        .iter()
        .chain(NON_AGENCY_HOSTS.iter())
        .any(|domain| matches_domain(&host, domain))
}

/// Check a discovered candidate's host, URL path and title/snippet text.
///
/// Reason codes are `non-business-content:…`, `blacklist_host:<host>`,
/// `directory_path:<hint>` and `directory_text:<hint>`; at most one path
/// and one text hint are reported.
#[must_use]
pub fn check_directory_candidate(candidate: &CandidateRaw) -> DirectoryCheck {
    let mut reasons = Vec::new();
    let host = host_for_filter(&candidate.discovered_website);
    let text = format!(
        "{} {}",
        candidate.discovered_name,
        candidate.snippet.as_deref().unwrap_or("")
    )
    .to_lowercase();
    let url = candidate.discovered_website.to_lowercase();

    if DOCS_TEXT_RE.is_match(&text) {
        reasons.push("non-business-content:text:docs".to_string());
    }
    if GUIDE_TEXT_RE.is_match(&text) {
        reasons.push("non-business-content:text:guide".to_string());
    }
    if host.ends_with(".wiki") && !host.contains("wikipedia.org") {
        reasons.push("non-business-content:wiki-host".to_string());
    }
    if is_known_directory_host(&host) {
        reasons.push(format!("blacklist_host:{host}"));
    }
    if let Some(hint) = DIRECTORY_PATH_HINTS.iter().find(|hint| url.contains(*hint)) {
        reasons.push(format!("directory_path:{hint}"));
    }
    if let Some(hint) = DIRECTORY_TEXT_HINTS.iter().find(|hint| text.contains(*hint)) {
        reasons.push(format!("directory_text:{hint}"));
    }

    DirectoryCheck {
        blocked: !reasons.is_empty(),
        reasons,
    }
}

/// Drop blocked candidates, logging each with its discovery flags.
pub(crate) fn retain_business_candidates(
    candidates: Vec<CandidateRaw>,
    source: &str,
) -> Vec<CandidateRaw> {
    candidates
        .into_iter()
        .filter_map(|mut candidate| {
            let check = check_directory_candidate(&candidate);
            if !check.blocked {
                return Some(candidate);
            }
            candidate.discovery_flags = Some(DiscoveryFlags {
                blocked_by_source: true,
                rejection_reasons: check.reasons,
            });
            tracing::debug!(
                source,
                website = %candidate.discovered_website,
                flags = ?candidate.discovery_flags,
                "dropped directory candidate"
            );
            None
        })
        .collect()
}
