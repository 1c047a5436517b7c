//! Index of the partners already listed in `listings.csv`.

use std::collections::HashSet;
use std::path::Path;

use agencydir_core::text::{normalize_text, normalize_website, slugify, website_domain};

use crate::csv_io::{read_csv_rows, CsvRow};
use crate::error::ListingsError;

/// Domains, slugs and the highest id of the existing listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingPartnerSnapshot {
    pub websites: HashSet<String>,
    pub slugs: HashSet<String>,
    pub max_id: u32,
}

impl ExistingPartnerSnapshot {
    /// Build the index from header-keyed listing rows.
    ///
    /// Websites are reduced to their bare domain. The slug is derived from
    /// `name location` (falling back to `slug` for the name), or from the
    /// location alone when that yields nothing.
    #[must_use]
    pub fn from_rows(rows: &[CsvRow]) -> Self {
        let mut snapshot = Self::default();
        for row in rows {
            if let Ok(id) = row.get("id").trim().parse::<u32>() {
                snapshot.max_id = snapshot.max_id.max(id);
            }

            let website = normalize_website(row.get("website"));
            if !website.is_empty() {
                let domain = website_domain(&website);
                if !domain.is_empty() {
                    snapshot.websites.insert(domain);
                }
            }

            let name = normalize_text(row.first_of(&["name", "slug"]));
            let location = normalize_text(row.get("location"));
            let slug = Some(slugify(&format!("{name} {location}")))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| slugify(&location));
            if !slug.is_empty() {
                snapshot.slugs.insert(slug);
            }
        }
        snapshot
    }
}

/// Load the snapshot from a listings CSV.
///
/// A missing or unparseable file yields an empty snapshot; the failure is
/// logged and never propagated.
#[must_use]
pub fn read_existing_listings(path: &Path) -> ExistingPartnerSnapshot {
    match read_csv_rows(path, None) {
        Ok(rows) => {
            let snapshot = ExistingPartnerSnapshot::from_rows(&rows);
            tracing::debug!(
                path = %path.display(),
                websites = snapshot.websites.len(),
                slugs = snapshot.slugs.len(),
                max_id = snapshot.max_id,
                "loaded existing listings"
            );
            snapshot
        }
        Err(ListingsError::Read { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            tracing::info!(path = %path.display(), "no existing listings file, starting empty");
            ExistingPartnerSnapshot::default()
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "existing listings unreadable, starting empty"
            );
            ExistingPartnerSnapshot::default()
        }
    }
}
