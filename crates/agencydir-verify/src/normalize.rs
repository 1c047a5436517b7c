use agencydir_core::text::{normalize_text, normalize_website, slugify};
use agencydir_core::{
    CandidateRaw, NormalizedPartner, PartnerStatus, RejectionReason, SearchQuery,
    VerificationMode, VerificationSignals, WebsiteStatus, PARTNER_SOURCE,
    PARTNER_VERIFICATION_METHOD,
};

use crate::email::{email_domain, is_valid_email};
use crate::platforms::extract_platforms;
use crate::scoring::{score_partner, ScoringFacts};

const MAX_DESCRIPTION_CHARS: usize = 360;
const TRUNCATED_DESCRIPTION_CHARS: usize = 357;
const FALLBACK_DESCRIPTION: &str = "Auto-discovered partner candidate from web search.";
const FALLBACK_NAME: &str = "Unnamed Partner";
const UNKNOWN_COUNTRY: &str = "Unknown";
const DEFAULT_PLATFORM: &str = "custom";

const NOTE_LOW_SIGNAL: &str = "low verification signal";
const NOTE_WEBSITE_FAILED: &str = "website verification failed";
const NOTE_LENIENT: &str = "lenient acceptance";

/// Normalize, score and classify one raw candidate.
///
/// Hard disqualifiers (missing name, missing website, no detected platform)
/// always reject. Otherwise a score below `min_score` sends the candidate to
/// review, and the verification mode decides between accepted, review and
/// rejected. `validation_notes` is never left empty.
#[must_use]
pub fn normalize_candidate(
    candidate: &CandidateRaw,
    query: &SearchQuery,
    min_score: u32,
    mode: VerificationMode,
    require_email: bool,
) -> NormalizedPartner {
    let website = normalize_website(&candidate.discovered_website);
    let name = strip_wrapping_quotes(&normalize_text(&candidate.discovered_name));
    let snippet = candidate.snippet.as_deref().unwrap_or("");

    let platform_text = format!(
        "{} {} {}",
        normalize_text(&candidate.discovered_name),
        snippet,
        normalize_text(&query.query)
    );
    let platform_seeds: Vec<String> = candidate
        .platforms
        .iter()
        .chain(query.platforms.iter())
        .cloned()
        .collect();
    let detected_platforms = extract_platforms(&platform_text, &platform_seeds);

    let location = normalize_text(candidate.location.as_deref().unwrap_or(""));
    let country = non_empty(candidate.country.as_deref())
        .or_else(|| non_empty(query.country.as_deref()))
        .map(normalize_text)
        .unwrap_or_default();
    let description = sanitize_description(if snippet.trim().is_empty() {
        &query.query
    } else {
        snippet
    });

    let email = normalize_text(candidate.email.as_deref().unwrap_or("")).to_lowercase();
    let email_valid = is_valid_email(&email);
    let verification = verification_state(candidate, &website, &email);

    let slug_name = if name.is_empty() { "partner" } else { name.as_str() };
    let slug_place = [location.as_str(), country.as_str()]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or("global");
    let slug = slugify(&format!("{slug_name} {slug_place}"));

    let score = score_partner(&ScoringFacts {
        name: &name,
        website: &website,
        platform_count: detected_platforms.len(),
        description: &description,
        has_country: !country.is_empty(),
        email_valid,
        signals: &verification,
    });

    let mut partner = NormalizedPartner {
        name: if name.is_empty() {
            FALLBACK_NAME.to_string()
        } else {
            name.clone()
        },
        website,
        location,
        country: if country.is_empty() {
            UNKNOWN_COUNTRY.to_string()
        } else {
            country
        },
        description,
        email_domain: email_domain(&email),
        email,
        platforms: if detected_platforms.is_empty() {
            vec![DEFAULT_PLATFORM.to_string()]
        } else {
            detected_platforms.clone()
        },
        source: PARTNER_SOURCE.to_string(),
        source_ref: if candidate.source_ref.trim().is_empty() {
            candidate.discovered_website.clone()
        } else {
            candidate.source_ref.clone()
        },
        verification_method: PARTNER_VERIFICATION_METHOD.to_string(),
        email_valid,
        verification,
        validation_notes: Vec::new(),
        score,
        status: PartnerStatus::PendingReview,
        reasons: Vec::new(),
        slug,
        assigned_id: None,
    };

    if name.is_empty() {
        partner.push_reason(RejectionReason::MissingName);
    }
    if partner.website.is_empty() {
        partner.push_reason(RejectionReason::MissingWebsite);
    }
    if detected_platforms.is_empty() {
        partner.push_reason(RejectionReason::NoPlatformSignal);
    }
    if require_email && !email_valid {
        partner.push_reason(RejectionReason::MissingOrInvalidEmail);
    }

    partner.status = classify(&mut partner, min_score, mode, require_email);
    ensure_note(&mut partner);
    partner
}

fn classify(
    partner: &mut NormalizedPartner,
    min_score: u32,
    mode: VerificationMode,
    require_email: bool,
) -> PartnerStatus {
    if partner.has_hard_disqualifier() {
        return PartnerStatus::Rejected;
    }

    let signals = &partner.verification;
    let has_signal = signals.contact_signal
        || signals.automation_signal
        || signals.services_signal
        || signals.work_signal;
    let website_ok = signals.website_ok;
    let email_missing = require_email && !partner.email_valid;

    if partner.score < min_score {
        partner
            .validation_notes
            .push(format!("score {} < threshold {min_score}", partner.score));
        return PartnerStatus::PendingReview;
    }

    match mode {
        VerificationMode::Strict => {
            if email_missing {
                PartnerStatus::Rejected
            } else if !website_ok {
                partner.validation_notes.push(NOTE_WEBSITE_FAILED.to_string());
                PartnerStatus::PendingReview
            } else if !has_signal {
                partner.validation_notes.push(NOTE_LOW_SIGNAL.to_string());
                PartnerStatus::PendingReview
            } else {
                PartnerStatus::Accepted
            }
        }
        VerificationMode::Moderate => {
            if email_missing {
                PartnerStatus::Rejected
            } else if !website_ok && !has_signal {
                partner.validation_notes.push(NOTE_LOW_SIGNAL.to_string());
                PartnerStatus::PendingReview
            } else {
                PartnerStatus::Accepted
            }
        }
        VerificationMode::Lenient => {
            if website_ok {
                partner.validation_notes.push(NOTE_LENIENT.to_string());
            }
            if email_missing {
                PartnerStatus::Rejected
            } else {
                PartnerStatus::Accepted
            }
        }
    }
}

fn ensure_note(partner: &mut NormalizedPartner) {
    if partner.validation_notes.is_empty() {
        let note = match partner.status {
            PartnerStatus::Accepted => "accepted",
            PartnerStatus::PendingReview => "review needed",
            PartnerStatus::Rejected => "rejected",
        };
        partner.validation_notes.push(note.to_string());
    }
}

/// Signals as seen by the scorer. A fetched status overrides `website_ok`;
/// a missing website forces the `missing` status.
fn verification_state(
    candidate: &CandidateRaw,
    website: &str,
    email: &str,
) -> VerificationSignals {
    let mut signals = candidate.verification_signals.clone().unwrap_or_default();
    signals.website_ok = signals.website_status == WebsiteStatus::Ok;
    signals.email_from_source = signals.email_from_source || !email.is_empty();
    if website.is_empty() {
        signals.website_ok = false;
        signals.website_status = WebsiteStatus::Missing;
    }
    signals
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Strip one leading and one trailing `'` or `"`.
fn strip_wrapping_quotes(value: &str) -> String {
    let value = value.strip_prefix(['\'', '"']).unwrap_or(value);
    let value = value.strip_suffix(['\'', '"']).unwrap_or(value);
    value.to_string()
}

fn sanitize_description(value: &str) -> String {
    let text = normalize_text(value);
    if text.is_empty() {
        return FALLBACK_DESCRIPTION.to_string();
    }
    if text.chars().count() > MAX_DESCRIPTION_CHARS {
        let truncated: String = text.chars().take(TRUNCATED_DESCRIPTION_CHARS).collect();
        return format!("{truncated}...");
    }
    text
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
