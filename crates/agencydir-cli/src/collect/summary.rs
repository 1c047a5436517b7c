//! JSON run summary written next to the staging CSV.

use agencydir_core::{
    NormalizedPartner, PartnerStatus, RejectionReason, VerificationMode, WebsiteStatus,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::runner::ClassifiedRun;

/// Run-level settings and counts known before classification results.
#[derive(Debug, Clone)]
pub(crate) struct RunHeader {
    pub started_at: DateTime<Utc>,
    pub sources: Vec<String>,
    pub max_results: u32,
    pub limit_per_source: u32,
    pub verification_mode: VerificationMode,
    pub min_score: u32,
    pub require_email: bool,
    pub total_discovered: usize,
    pub appended: usize,
    pub staging_file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QualityGate {
    pub with_email: usize,
    pub validated_website: usize,
    pub blocked_by_domain: usize,
    pub avg_verification_score: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunSummary {
    pub started_at: String,
    pub sources: Vec<String>,
    pub max_results: u32,
    pub limit_per_source: u32,
    pub verification_mode: VerificationMode,
    pub min_score: u32,
    pub require_email: bool,
    pub total_discovered: usize,
    pub accepted: usize,
    pub pending_review: usize,
    pub rejected: usize,
    pub appended: usize,
    pub staging_file: String,
    pub quality_gate: QualityGate,
    pub candidates: Vec<CandidateSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValidationSummary {
    pub website_ok: bool,
    pub contact_signal: bool,
    pub about_signal: bool,
    pub email_valid: bool,
    pub email_domain: String,
    pub website_status: WebsiteStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignalSummary {
    pub contact_signal: bool,
    pub about_signal: bool,
    pub automation_signal: bool,
    pub services_signal: bool,
    pub work_signal: bool,
    pub social_signal: bool,
    pub mailto_signal: bool,
    pub email_from_source: bool,
    pub website_status: WebsiteStatus,
}

/// Per-candidate diagnostics.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CandidateSummary {
    pub status: PartnerStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub name: String,
    pub country: String,
    pub website: String,
    pub source: String,
    pub email: String,
    pub verification_score: u32,
    pub verification_status: PartnerStatus,
    pub validation_notes: Vec<String>,
    #[serde(rename = "reasonCodes")]
    pub reason_codes: Vec<RejectionReason>,
    pub validation: ValidationSummary,
    pub signals: SignalSummary,
    pub summary: String,
}

impl CandidateSummary {
    fn from_partner(partner: &NormalizedPartner) -> Self {
        let signals = &partner.verification;
        Self {
            status: partner.status,
            id: partner.assigned_id,
            name: partner.name.clone(),
            country: partner.country.clone(),
            website: partner.website.clone(),
            source: partner.source.clone(),
            email: partner.email.clone(),
            verification_score: partner.score,
            verification_status: partner.status,
            validation_notes: partner.validation_notes.clone(),
            reason_codes: partner.reasons.clone(),
            validation: ValidationSummary {
                website_ok: signals.website_ok,
                contact_signal: signals.contact_signal,
                about_signal: signals.about_signal,
                email_valid: partner.email_valid,
                email_domain: partner.email_domain.clone(),
                website_status: signals.website_status,
            },
            signals: SignalSummary {
                contact_signal: signals.contact_signal,
                about_signal: signals.about_signal,
                automation_signal: signals.automation_signal,
                services_signal: signals.services_signal,
                work_signal: signals.work_signal,
                social_signal: signals.social_signal,
                mailto_signal: signals.mailto_signal,
                email_from_source: signals.email_from_source,
                website_status: signals.website_status,
            },
            summary: summary_line(partner),
        }
    }
}

/// `name | country | platforms | score=N | status | website`
fn summary_line(partner: &NormalizedPartner) -> String {
    format!(
        "{} | {} | {} | score={} | {} | {}",
        partner.name,
        partner.country,
        partner.platforms.join("/"),
        partner.score,
        partner.status,
        partner.website
    )
}

/// Quality metrics over the accepted partners.
pub(crate) fn quality_gate(run: &ClassifiedRun) -> QualityGate {
    let accepted: Vec<&NormalizedPartner> =
        run.partners.iter().filter(|p| p.is_accepted()).collect();
    let total_score: u64 = accepted.iter().map(|p| u64::from(p.score)).sum();
    #[allow(clippy::cast_precision_loss)]
    let avg_verification_score = if accepted.is_empty() {
        0.0
    } else {
        ((total_score as f64 / accepted.len() as f64) * 100.0).round() / 100.0
    };

    QualityGate {
        with_email: accepted.iter().filter(|p| !p.email.is_empty()).count(),
        validated_website: accepted.iter().filter(|p| p.verification.website_ok).count(),
        blocked_by_domain: run.duplicates,
        avg_verification_score,
    }
}

pub(crate) fn build_run_summary(header: RunHeader, run: &ClassifiedRun) -> RunSummary {
    let count = |status: PartnerStatus| run.partners.iter().filter(|p| p.status == status).count();

    RunSummary {
        started_at: header.started_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        sources: header.sources,
        max_results: header.max_results,
        limit_per_source: header.limit_per_source,
        verification_mode: header.verification_mode,
        min_score: header.min_score,
        require_email: header.require_email,
        total_discovered: header.total_discovered,
        accepted: count(PartnerStatus::Accepted),
        pending_review: count(PartnerStatus::PendingReview),
        rejected: run.validation_rejections + run.duplicates,
        appended: header.appended,
        staging_file: header.staging_file,
        quality_gate: quality_gate(run),
        candidates: run.partners.iter().map(CandidateSummary::from_partner).collect(),
    }
}

#[cfg(test)]
mod tests {
    use agencydir_core::VerificationSignals;
    use chrono::TimeZone;

    use super::*;

    fn partner(name: &str, status: PartnerStatus, score: u32, email: &str) -> NormalizedPartner {
        NormalizedPartner {
            name: name.to_string(),
            website: format!("https://{}.io", name.to_lowercase()),
            location: String::new(),
            country: "DE".to_string(),
            description: String::new(),
            email: email.to_string(),
            platforms: vec!["zapier".to_string(), "make".to_string()],
            source: "public_api".to_string(),
            source_ref: String::new(),
            verification_method: "api_match".to_string(),
            email_valid: !email.is_empty(),
            email_domain: String::new(),
            verification: VerificationSignals {
                website_ok: status == PartnerStatus::Accepted,
                website_status: WebsiteStatus::Ok,
                ..VerificationSignals::default()
            },
            validation_notes: vec![status.as_str().to_string()],
            score,
            status,
            reasons: Vec::new(),
            slug: name.to_lowercase(),
            assigned_id: (status == PartnerStatus::Accepted).then_some(7),
        }
    }

    fn run() -> ClassifiedRun {
        let mut duplicate = partner("Dupe", PartnerStatus::Rejected, 90, "a@dupe.io");
        duplicate.reasons.push(RejectionReason::DuplicateDomainOrSlug);
        ClassifiedRun {
            partners: vec![
                partner("Acme", PartnerStatus::Accepted, 100, "ops@acme.io"),
                partner("Flow", PartnerStatus::Accepted, 51, ""),
                partner("Bolt", PartnerStatus::PendingReview, 30, ""),
                partner("Nameless", PartnerStatus::Rejected, 10, ""),
                duplicate,
            ],
            duplicates: 1,
            validation_rejections: 1,
        }
    }

    fn header() -> RunHeader {
        RunHeader {
            started_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
            sources: vec!["duckduckgo".to_string()],
            max_results: 5000,
            limit_per_source: 2000,
            verification_mode: VerificationMode::Strict,
            min_score: 45,
            require_email: true,
            total_discovered: 5,
            appended: 0,
            staging_file: String::new(),
        }
    }

    #[test]
    fn quality_gate_covers_accepted_partners() {
        let gate = quality_gate(&run());
        assert_eq!(gate.with_email, 1);
        assert_eq!(gate.validated_website, 2);
        assert_eq!(gate.blocked_by_domain, 1);
        assert!((gate.avg_verification_score - 75.5).abs() < f64::EPSILON);
    }

    #[test]
    fn average_is_rounded_to_two_decimals() {
        let mut run = run();
        run.partners.push(partner("Third", PartnerStatus::Accepted, 50, ""));
        // (100 + 51 + 50) / 3 = 67.0
        let gate = quality_gate(&run);
        assert!((gate.avg_verification_score - 67.0).abs() < f64::EPSILON);

        run.partners.push(partner("Fourth", PartnerStatus::Accepted, 0, ""));
        // 201 / 4 = 50.25
        let gate = quality_gate(&run);
        assert!((gate.avg_verification_score - 50.25).abs() < 1e-9);
    }

    #[test]
    fn empty_run_has_zero_average() {
        let gate = quality_gate(&ClassifiedRun::default());
        assert!(gate.avg_verification_score.abs() < f64::EPSILON);
    }

    #[test]
    fn summary_counts_statuses_and_duplicates() {
        let summary = build_run_summary(header(), &run());
        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.pending_review, 1);
        assert_eq!(summary.rejected, 2);
        assert_eq!(summary.candidates.len(), 5);
        assert_eq!(
            summary.candidates[0].summary,
            "Acme | DE | zapier/make | score=100 | accepted | https://acme.io"
        );
    }

    #[test]
    fn summary_json_uses_report_keys() {
        let summary = build_run_summary(header(), &run());
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["startedAt"], "2026-03-01T09:30:00.000Z");
        assert_eq!(json["verificationMode"], "strict");
        assert_eq!(json["qualityGate"]["blockedByDomain"], 1);
        assert_eq!(json["qualityGate"]["avgVerificationScore"], 75.5);

        let first = &json["candidates"][0];
        assert_eq!(first["status"], "accepted");
        assert_eq!(first["id"], 7);
        assert_eq!(first["verification_score"], 100);
        assert_eq!(first["verification_status"], "accepted");
        assert_eq!(first["validation"]["websiteStatus"], "ok");
        assert_eq!(first["signals"]["emailFromSource"], false);

        let pending = &json["candidates"][2];
        assert!(pending.get("id").is_none());
        assert_eq!(json["candidates"][4]["reasonCodes"][0], "duplicate domain or slug");
    }
}
