//! Listing and staging rows built from normalized partners.

use std::cmp::Ordering;

use agencydir_core::NormalizedPartner;

use crate::csv_io::csv_line;
use crate::schema::{LISTING_COLUMNS, STAGING_COLUMNS};

/// One row of `listings.csv`, fields in [`LISTING_COLUMNS`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRow {
    pub id: String,
    pub name: String,
    pub platforms: String,
    pub location: String,
    pub country: String,
    pub description: String,
    pub price_min: String,
    pub price_max: String,
    pub rating: String,
    pub review_count: String,
    pub featured: String,
    pub website: String,
    pub email: String,
    pub source: String,
    pub source_ref: String,
    pub verified: String,
    pub verification_method: String,
    pub verified_at: String,
}

impl ListingRow {
    /// A new, unverified listing for `partner` with zeroed pricing and rating.
    #[must_use]
    pub fn from_partner(partner: &NormalizedPartner, id: u32) -> Self {
        Self {
            id: id.to_string(),
            name: partner.name.clone(),
            platforms: partner.platforms.join(","),
            location: partner.location.clone(),
            country: partner.country.clone(),
            description: partner.description.clone(),
            price_min: "0".to_string(),
            price_max: "0".to_string(),
            rating: "0".to_string(),
            review_count: "0".to_string(),
            featured: "false".to_string(),
            website: partner.website.clone(),
            email: partner.email.clone(),
            source: partner.source.clone(),
            source_ref: partner.source_ref.clone(),
            verified: "false".to_string(),
            verification_method: partner.verification_method.clone(),
            verified_at: String::new(),
        }
    }

    #[must_use]
    pub fn fields(&self) -> [&str; LISTING_COLUMNS.len()] {
        [
            self.id.as_str(),
            self.name.as_str(),
            self.platforms.as_str(),
            self.location.as_str(),
            self.country.as_str(),
            self.description.as_str(),
            self.price_min.as_str(),
            self.price_max.as_str(),
            self.rating.as_str(),
            self.review_count.as_str(),
            self.featured.as_str(),
            self.website.as_str(),
            self.email.as_str(),
            self.source.as_str(),
            self.source_ref.as_str(),
            self.verified.as_str(),
            self.verification_method.as_str(),
            self.verified_at.as_str(),
        ]
    }

    /// The escaped CSV line for this row.
    #[must_use]
    pub fn to_line(&self) -> String {
        csv_line(self.fields())
    }
}

/// A listing row plus the verification diagnostics written to staging files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagingRow {
    pub listing: ListingRow,
    pub source_website: String,
    pub verification_score: u32,
    pub verification_status: String,
    pub validation_notes: String,
    pub contact_signal: bool,
}

impl StagingRow {
    #[must_use]
    pub fn from_partner(partner: &NormalizedPartner, id: u32) -> Self {
        let source_website = if partner.source_ref.is_empty() {
            partner.website.clone()
        } else {
            partner.source_ref.clone()
        };
        Self {
            listing: ListingRow::from_partner(partner, id),
            source_website,
            verification_score: partner.score,
            verification_status: partner.status.as_str().to_string(),
            validation_notes: partner.validation_notes.join("; "),
            contact_signal: partner.verification.contact_signal,
        }
    }

    /// Fields in [`STAGING_COLUMNS`] order.
    #[must_use]
    pub fn fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = self
            .listing
            .fields()
            .iter()
            .map(|f| (*f).to_string())
            .collect();
        fields.extend([
            self.source_website.clone(),
            self.verification_score.to_string(),
            self.verification_status.clone(),
            self.validation_notes.clone(),
            self.contact_signal.to_string(),
        ]);
        debug_assert_eq!(fields.len(), STAGING_COLUMNS.len());
        fields
    }

    #[must_use]
    pub fn to_line(&self) -> String {
        csv_line(self.fields())
    }
}

/// Staging order: e-mail, website, country, `|`-joined platforms, then
/// partners with a contact signal first.
pub fn sort_for_staging(partners: &mut [&NormalizedPartner]) {
    partners.sort_by(|a, b| staging_order(a, b));
}

fn staging_order(a: &NormalizedPartner, b: &NormalizedPartner) -> Ordering {
    a.email
        .cmp(&b.email)
        .then_with(|| a.website.cmp(&b.website))
        .then_with(|| a.country.cmp(&b.country))
        .then_with(|| a.platforms.join("|").cmp(&b.platforms.join("|")))
        .then_with(|| {
            b.verification
                .contact_signal
                .cmp(&a.verification.contact_signal)
        })
}

#[cfg(test)]
mod tests {
    use agencydir_core::{PartnerStatus, VerificationSignals};

    use super::*;

    fn partner(email: &str, website: &str, contact: bool) -> NormalizedPartner {
        NormalizedPartner {
            name: "Acme, Automations".to_string(),
            website: website.to_string(),
            location: "Berlin".to_string(),
            country: "DE".to_string(),
            description: "Zapier \"experts\"".to_string(),
            email: email.to_string(),
            platforms: vec!["zapier".to_string(), "make".to_string()],
            source: "public_api".to_string(),
            source_ref: "https://acme.io/".to_string(),
            verification_method: "api_match".to_string(),
            email_valid: true,
            email_domain: "acme.io".to_string(),
            verification: VerificationSignals {
                contact_signal: contact,
                ..VerificationSignals::default()
            },
            validation_notes: vec!["accepted".to_string(), "lenient acceptance".to_string()],
            score: 97,
            status: PartnerStatus::Accepted,
            reasons: Vec::new(),
            slug: "acme-automations-berlin".to_string(),
            assigned_id: Some(41),
        }
    }

    #[test]
    fn listing_row_uses_defaults_for_unknown_columns() {
        let row = ListingRow::from_partner(&partner("ops@acme.io", "https://acme.io", true), 41);
        assert_eq!(
            row.to_line(),
            "41,\"Acme, Automations\",\"zapier,make\",Berlin,DE,\"Zapier \"\"experts\"\"\",\
             0,0,0,0,false,https://acme.io,ops@acme.io,public_api,https://acme.io/,false,api_match,"
        );
    }

    #[test]
    fn staging_row_appends_diagnostics() {
        let row = StagingRow::from_partner(&partner("ops@acme.io", "https://acme.io", true), 41);
        let fields = row.fields();
        assert_eq!(fields.len(), STAGING_COLUMNS.len());
        assert_eq!(
            &fields[LISTING_COLUMNS.len()..],
            &[
                "https://acme.io/",
                "97",
                "accepted",
                "accepted; lenient acceptance",
                "true"
            ]
        );
    }

    #[test]
    fn staging_order_breaks_ties_on_contact_signal() {
        let without = partner("a@acme.io", "https://acme.io", false);
        let with = partner("a@acme.io", "https://acme.io", true);
        let other = partner("0@zeta.io", "https://zeta.io", false);

        let mut rows = vec![&without, &with, &other];
        sort_for_staging(&mut rows);

        assert_eq!(rows[0].email, "0@zeta.io");
        assert!(rows[1].verification.contact_signal);
        assert!(!rows[2].verification.contact_signal);
    }
}
