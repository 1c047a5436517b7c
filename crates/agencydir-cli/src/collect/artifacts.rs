//! Staging CSV, summary JSON and listings append for a collection run.

use std::path::{Path, PathBuf};

use agencydir_core::NormalizedPartner;
use agencydir_listings::{append_csv_lines, write_csv, ListingRow, StagingRow, STAGING_COLUMNS};
use anyhow::Context;
use chrono::{DateTime, Utc};

use super::summary::RunSummary;

/// `YYYYMMDDHHMM` in UTC.
pub(crate) fn run_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d%H%M").to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArtifactPaths {
    pub staging_csv: PathBuf,
    pub summary_json: PathBuf,
}

impl ArtifactPaths {
    pub(crate) fn new(staging_dir: &Path, timestamp: &str) -> Self {
        Self {
            staging_csv: staging_dir.join(format!("partners_{timestamp}.csv")),
            summary_json: staging_dir.join(format!("partners_{timestamp}.summary.json")),
        }
    }
}

pub(crate) fn write_staging_csv(path: &Path, rows: &[StagingRow]) -> anyhow::Result<()> {
    let lines: Vec<String> = rows.iter().map(StagingRow::to_line).collect();
    write_csv(path, &STAGING_COLUMNS, &lines)
        .with_context(|| format!("failed to write staging file {}", path.display()))
}

pub(crate) fn write_summary_json(path: &Path, summary: &RunSummary) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write summary {}", path.display()))
}

/// Append accepted partners to the listings CSV as unverified rows.
///
/// Returns the number of rows appended.
pub(crate) fn append_to_listings(
    listings_path: &Path,
    partners: &[&NormalizedPartner],
) -> anyhow::Result<usize> {
    let lines: Vec<String> = partners
        .iter()
        .map(|p| ListingRow::from_partner(p, p.assigned_id.unwrap_or(0)).to_line())
        .collect();
    append_csv_lines(listings_path, &lines)
        .with_context(|| format!("failed to append to {}", listings_path.display()))?;
    Ok(lines.len())
}

#[cfg(test)]
mod tests {
    use agencydir_core::{PartnerStatus, VerificationSignals};
    use agencydir_listings::read_csv_rows;
    use chrono::TimeZone;

    use super::*;

    fn accepted(name: &str, id: Option<u32>) -> NormalizedPartner {
        NormalizedPartner {
            name: name.to_string(),
            website: format!("https://{}.io", name.to_lowercase()),
            location: "Berlin".to_string(),
            country: "DE".to_string(),
            description: "Zapier, Make and n8n builds".to_string(),
            email: format!("ops@{}.io", name.to_lowercase()),
            platforms: vec!["zapier".to_string(), "make".to_string()],
            source: "public_api".to_string(),
            source_ref: String::new(),
            verification_method: "api_match".to_string(),
            email_valid: true,
            email_domain: format!("{}.io", name.to_lowercase()),
            verification: VerificationSignals {
                contact_signal: true,
                ..VerificationSignals::default()
            },
            validation_notes: vec!["accepted".to_string()],
            score: 120,
            status: PartnerStatus::Accepted,
            reasons: Vec::new(),
            slug: name.to_lowercase(),
            assigned_id: id,
        }
    }

    #[test]
    fn timestamp_is_minute_resolution() {
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 7, 3, 59).unwrap();
        assert_eq!(run_timestamp(at), "202601050703");
    }

    #[test]
    fn paths_share_the_timestamp() {
        let paths = ArtifactPaths::new(Path::new("data/staging"), "202601050703");
        assert_eq!(
            paths.staging_csv,
            Path::new("data/staging/partners_202601050703.csv")
        );
        assert_eq!(
            paths.summary_json,
            Path::new("data/staging/partners_202601050703.summary.json")
        );
    }

    #[test]
    fn staging_csv_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staging").join("partners_1.csv");
        let acme = accepted("Acme", Some(12));

        write_staging_csv(&path, &[StagingRow::from_partner(&acme, 12)]).unwrap();

        let rows = read_csv_rows(&path, None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("id"), "12");
        assert_eq!(rows[0].get("platforms"), "zapier,make");
        assert_eq!(rows[0].get("description"), "Zapier, Make and n8n builds");
        assert_eq!(rows[0].get("source_website"), "https://acme.io");
        assert_eq!(rows[0].get("contact_signal"), "true");
    }

    #[test]
    fn append_writes_unverified_rows_with_fallback_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.csv");
        std::fs::write(&path, "id,name,platforms\n1,Existing,zapier").unwrap();
        let acme = accepted("Acme", Some(2));
        let flow = accepted("Flow", None);

        let appended = append_to_listings(&path, &[&acme, &flow]).unwrap();

        assert_eq!(appended, 2);
        let rows = read_csv_rows(&path, None).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].get("id"), "2");
        assert_eq!(rows[2].get("id"), "0");
        assert_eq!(rows[1].get("platforms"), "zapier,make");
    }

    #[test]
    fn append_to_missing_listings_fails() {
        let dir = tempfile::tempdir().unwrap();
        let acme = accepted("Acme", Some(2));
        assert!(append_to_listings(&dir.path().join("absent.csv"), &[&acme]).is_err());
    }
}
