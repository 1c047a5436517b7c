use serde::{Deserialize, Serialize};

use crate::query::SearchQuery;
use crate::signals::VerificationSignals;

/// Why a source adapter flagged a discovered result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryFlags {
    pub blocked_by_source: bool,
    #[serde(default)]
    pub rejection_reasons: Vec<String>,
}

/// A source adapter's raw output, before normalization.
///
/// Created by `discover`; `fetch_details` returns an enriched copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRaw {
    pub source: String,
    pub discovered_name: String,
    pub discovered_website: String,
    pub source_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<SearchQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_signals: Option<VerificationSignals>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery_flags: Option<DiscoveryFlags>,
}

impl CandidateRaw {
    /// The candidate's e-mail if it is present and not blank.
    #[must_use]
    pub fn known_email(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }

    /// Discovered name is empty or the `Unknown` placeholder.
    #[must_use]
    pub fn has_placeholder_name(&self) -> bool {
        let name = self.discovered_name.trim();
        name.is_empty() || name.eq_ignore_ascii_case("unknown")
    }
}
