//! The normalized, scored partner record and its classification enums.

use serde::{Deserialize, Serialize};

use crate::signals::VerificationSignals;

/// Fixed `source` value stamped on every normalized partner.
pub const PARTNER_SOURCE: &str = "public_api";
/// Fixed `verification_method` value stamped on every normalized partner.
pub const PARTNER_VERIFICATION_METHOD: &str = "api_match";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerStatus {
    Accepted,
    PendingReview,
    Rejected,
}

impl PartnerStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PartnerStatus::Accepted => "accepted",
            PartnerStatus::PendingReview => "pending_review",
            PartnerStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for PartnerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much website evidence is required before a candidate is accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMode {
    #[default]
    Strict,
    Moderate,
    Lenient,
}

impl VerificationMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationMode::Strict => "strict",
            VerificationMode::Moderate => "moderate",
            VerificationMode::Lenient => "lenient",
        }
    }
}

impl std::fmt::Display for VerificationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VerificationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(VerificationMode::Strict),
            "moderate" => Ok(VerificationMode::Moderate),
            "lenient" => Ok(VerificationMode::Lenient),
            other => Err(format!(
                "unknown verification mode '{other}' (expected strict, moderate or lenient)"
            )),
        }
    }
}

/// Machine-readable rejection reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    MissingName,
    MissingWebsite,
    NoPlatformSignal,
    MissingOrInvalidEmail,
    DuplicateDomainOrSlug,
}

impl RejectionReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RejectionReason::MissingName => "missing name",
            RejectionReason::MissingWebsite => "missing website",
            RejectionReason::NoPlatformSignal => "no platform signal",
            RejectionReason::MissingOrInvalidEmail => "missing or invalid email",
            RejectionReason::DuplicateDomainOrSlug => "duplicate domain or slug",
        }
    }

    /// Reasons that reject a candidate regardless of score or mode.
    #[must_use]
    pub fn is_hard_disqualifier(self) -> bool {
        matches!(
            self,
            RejectionReason::MissingName
                | RejectionReason::MissingWebsite
                | RejectionReason::NoPlatformSignal
        )
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RejectionReason {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A candidate after normalization, scoring and classification.
///
/// `status` is set by the normalizer and may only be downgraded to
/// [`PartnerStatus::Rejected`] by the dedup ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPartner {
    pub name: String,
    pub website: String,
    pub location: String,
    pub country: String,
    pub description: String,
    pub email: String,
    pub platforms: Vec<String>,
    pub source: String,
    pub source_ref: String,
    pub verification_method: String,
    pub email_valid: bool,
    pub email_domain: String,
    pub verification: VerificationSignals,
    pub validation_notes: Vec<String>,
    pub score: u32,
    pub status: PartnerStatus,
    pub reasons: Vec<RejectionReason>,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_id: Option<u32>,
}

impl NormalizedPartner {
    /// Record a reason together with its matching validation note.
    pub fn push_reason(&mut self, reason: RejectionReason) {
        self.reasons.push(reason);
        self.validation_notes.push(reason.as_str().to_string());
    }

    #[must_use]
    pub fn has_hard_disqualifier(&self) -> bool {
        self.reasons.iter().any(|r| r.is_hard_disqualifier())
    }

    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.status == PartnerStatus::Accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_mode_parses_case_insensitively() {
        assert_eq!("Moderate".parse::<VerificationMode>(), Ok(VerificationMode::Moderate));
        assert_eq!(" lenient ".parse::<VerificationMode>(), Ok(VerificationMode::Lenient));
        assert!("loose".parse::<VerificationMode>().is_err());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&PartnerStatus::PendingReview).unwrap();
        assert_eq!(json, "\"pending_review\"");
        assert_eq!(PartnerStatus::PendingReview.to_string(), "pending_review");
    }

    #[test]
    fn only_structural_reasons_are_hard_disqualifiers() {
        assert!(RejectionReason::MissingWebsite.is_hard_disqualifier());
        assert!(!RejectionReason::MissingOrInvalidEmail.is_hard_disqualifier());
        assert!(!RejectionReason::DuplicateDomainOrSlug.is_hard_disqualifier());
    }
}
