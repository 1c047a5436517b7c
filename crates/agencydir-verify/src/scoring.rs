//! Additive verification score.

use std::sync::LazyLock;

use agencydir_core::text::{strip_scheme, website_domain};
use agencydir_core::VerificationSignals;
use regex::Regex;

use crate::platforms::has_automation_hint;

pub const NAME_POINTS: u32 = 20;
pub const BARE_DOMAIN_POINTS: u32 = 20;
pub const PLATFORM_POINTS: u32 = 25;
pub const MULTI_PLATFORM_POINTS: u32 = 10;
pub const DESCRIPTION_POINTS: u32 = 15;
pub const COUNTRY_POINTS: u32 = 10;
pub const EMAIL_POINTS: u32 = 25;
pub const WEBSITE_OK_POINTS: u32 = 10;
pub const CONTACT_POINTS: u32 = 22;
pub const ABOUT_POINTS: u32 = 10;
pub const AUTOMATION_POINTS: u32 = 12;
pub const WORK_POINTS: u32 = 10;
pub const SERVICES_POINTS: u32 = 10;
pub const SOCIAL_POINTS: u32 = 8;
pub const NAME_HINT_POINTS: u32 = 15;
pub const DESCRIPTION_HINT_POINTS: u32 = 15;
pub const TLD_POINTS: u32 = 8;

const MIN_DESCRIPTION_CHARS: usize = 80;
const BONUS_TLDS: [&str; 2] = [".io", ".ai"];

static BARE_DOMAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z0-9.-]+\.[a-z]{2,}$").expect("valid regex"));

/// Everything the score depends on.
#[derive(Debug, Clone, Copy)]
pub struct ScoringFacts<'a> {
    pub name: &'a str,
    pub website: &'a str,
    pub platform_count: usize,
    pub description: &'a str,
    pub has_country: bool,
    pub email_valid: bool,
    pub signals: &'a VerificationSignals,
}

fn points(condition: bool, value: u32) -> u32 {
    if condition {
        value
    } else {
        0
    }
}

/// Sum the points for every signal present. Adding a signal never lowers
/// the total.
#[must_use]
pub fn score_partner(facts: &ScoringFacts<'_>) -> u32 {
    let signals = facts.signals;
    let domain = website_domain(facts.website);

    points(facts.name.chars().count() > 2, NAME_POINTS)
        + points(
            BARE_DOMAIN_RE.is_match(strip_scheme(facts.website)),
            BARE_DOMAIN_POINTS,
        )
        + points(facts.platform_count >= 1, PLATFORM_POINTS)
        + points(facts.platform_count > 1, MULTI_PLATFORM_POINTS)
        + points(
            facts.description.chars().count() > MIN_DESCRIPTION_CHARS,
            DESCRIPTION_POINTS,
        )
        + points(facts.has_country, COUNTRY_POINTS)
        + points(facts.email_valid, EMAIL_POINTS)
        + points(signals.website_ok, WEBSITE_OK_POINTS)
        + points(signals.contact_signal, CONTACT_POINTS)
        + points(signals.about_signal, ABOUT_POINTS)
        + points(signals.automation_signal, AUTOMATION_POINTS)
        + points(signals.work_signal, WORK_POINTS)
        + points(signals.services_signal, SERVICES_POINTS)
        + points(signals.social_signal, SOCIAL_POINTS)
        + points(has_automation_hint(facts.name), NAME_HINT_POINTS)
        + points(has_automation_hint(facts.description), DESCRIPTION_HINT_POINTS)
        + points(
            BONUS_TLDS.iter().any(|tld| domain.ends_with(tld)),
            TLD_POINTS,
        )
}
