//! Merge listing and staging CSVs into one deduplicated vendor master list.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use agencydir_core::text::{normalize_text, website_domain};

use crate::csv_io::{read_csv_rows, write_csv, CsvRow};
use crate::error::ListingsError;
use crate::rows::ListingRow;
use crate::schema::LISTING_COLUMNS;

const ID_STRIDE: usize = 1_000_000;
const MASTER_SOURCE_TAG: &str = "vendor_master";
const FILE_SOURCE_TAG: &str = "source_file";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorListMode {
    /// Existing master plus the `--new` files.
    Append,
    /// Base listings plus every staging CSV.
    Full,
}

impl VendorListMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VendorListMode::Append => "append",
            VendorListMode::Full => "full",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorListOptions {
    pub output: PathBuf,
    pub base: PathBuf,
    pub staging_dir: PathBuf,
    pub mode: VendorListMode,
    pub new_files: Vec<PathBuf>,
    pub include_staging: bool,
    /// Per-input row cap for trial runs.
    pub max_rows: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorListReport {
    pub output: PathBuf,
    pub mode: VendorListMode,
    pub sources: Vec<PathBuf>,
    pub incoming: usize,
    pub unique: usize,
    pub duplicates: usize,
}

/// Inputs in merge order.
///
/// Append mode reads the current master first, then the `--new` files.
/// Full mode reads the base listings, then `*.csv` files from the staging
/// directory sorted by file name. An unreadable staging directory adds
/// nothing.
#[must_use]
pub fn collect_inputs(options: &VendorListOptions) -> Vec<PathBuf> {
    match options.mode {
        VendorListMode::Append => std::iter::once(options.output.clone())
            .chain(options.new_files.iter().cloned())
            .collect(),
        VendorListMode::Full => {
            let mut inputs = vec![options.base.clone()];
            if options.include_staging {
                inputs.extend(staging_files(&options.staging_dir));
            }
            inputs
        }
    }
}

fn staging_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "staging directory unreadable");
            return Vec::new();
        }
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    files
}

/// A normalized vendor row and the domain used for dedup.
#[derive(Debug, Clone, PartialEq, Eq)]
struct VendorRecord {
    row: ListingRow,
    domain: String,
}

impl VendorRecord {
    fn is_blank(&self) -> bool {
        self.row.name.is_empty() && self.row.website.is_empty() && self.row.email.is_empty()
    }

    /// `domain:` when a website is known, else `email:`, else
    /// `fallback:name|country|location`.
    fn key(&self) -> String {
        if !self.domain.is_empty() {
            format!("domain:{}", self.domain)
        } else if !self.row.email.is_empty() {
            format!("email:{}", self.row.email)
        } else {
            format!(
                "fallback:{}|{}|{}",
                self.row.name, self.row.country, self.row.location
            )
        }
    }
}

/// `https://host/path` with a lowercased host, no `www.`, no port, query or
/// fragment, and no trailing slash. Empty for blank input.
fn canonical_vendor_website(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let lowered = trimmed.to_lowercase();
    let rest = if lowered.starts_with("http://") || lowered.starts_with("https://") {
        &trimmed[trimmed.find("://").map_or(0, |i| i + 3)..]
    } else {
        trimmed
    };
    let rest = rest.split(['?', '#']).next().unwrap_or("");
    let (authority, path) = rest.split_at(rest.find('/').unwrap_or(rest.len()));
    let host = authority.rsplit('@').next().unwrap_or(authority);
    let host = host.split(':').next().unwrap_or(host).to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    if host.is_empty() || host.contains(char::is_whitespace) {
        return lowered;
    }
    format!("https://{host}{}", path.trim_end_matches('/'))
}

fn or_default(value: &str, default: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

fn normalize_vendor_row(raw: &CsvRow, id: usize, source_tag: &str) -> VendorRecord {
    let website = canonical_vendor_website(raw.get("website"));
    let domain = if website.starts_with("https://") {
        website_domain(&website)
    } else {
        String::new()
    };
    VendorRecord {
        row: ListingRow {
            id: id.to_string(),
            name: normalize_text(raw.first_of(&["name", "slug"])),
            platforms: normalize_text(raw.get("platforms")),
            location: normalize_text(raw.first_of(&["location", "city"])),
            country: normalize_text(raw.get("country")),
            description: normalize_text(raw.get("description")),
            price_min: or_default(raw.first_of(&["price_min", "priceMin"]), "0"),
            price_max: or_default(raw.first_of(&["price_max", "priceMax"]), "0"),
            rating: or_default(raw.get("rating"), "0"),
            review_count: or_default(raw.first_of(&["review_count", "reviewCount"]), "0"),
            featured: or_default(raw.first_of(&["featured", "is_featured"]), "false"),
            website,
            email: normalize_text(raw.get("email")).to_lowercase(),
            source: or_default(raw.get("source"), source_tag),
            source_ref: normalize_text(raw.first_of(&["source_ref", "sourceRef"])),
            verified: or_default(raw.first_of(&["verified", "is_verified"]), "false"),
            verification_method: or_default(
                raw.first_of(&["verification_method", "verificationMethod"]),
                "none",
            ),
            verified_at: normalize_text(raw.first_of(&["verified_at", "verifiedAt"])),
        },
        domain,
    }
}

/// Build the vendor master CSV at `options.output`.
///
/// Rows are normalized, rows without name, website and e-mail are skipped,
/// and the first row per dedup key wins. Output is sorted by name, then
/// website. Inputs that cannot be read contribute no rows. Every row gets
/// the positional id `input_index * 1_000_000 + unique_so_far + 1`.
///
/// # Errors
///
/// Returns [`ListingsError::AppendWithoutInputs`] in append mode without
/// `--new` files, [`ListingsError::NoInputs`] when none of the inputs can be
/// read (the output is left untouched), and [`ListingsError::Write`] if the
/// output cannot be written.
pub fn build_vendor_list(options: &VendorListOptions) -> Result<VendorListReport, ListingsError> {
    if options.mode == VendorListMode::Append && options.new_files.is_empty() {
        return Err(ListingsError::AppendWithoutInputs);
    }
    let inputs = collect_inputs(options);

    let mut seen: HashMap<String, VendorRecord> = HashMap::new();
    let mut readable = 0;
    let mut incoming = 0;
    let mut duplicates = 0;

    for (index, input) in inputs.iter().enumerate() {
        let rows = match read_csv_rows(input, options.max_rows) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(
                    path = %input.display(),
                    error = %e,
                    "skipping unreadable vendor input"
                );
                continue;
            }
        };
        readable += 1;
        let source_tag = if *input == options.output {
            MASTER_SOURCE_TAG
        } else {
            FILE_SOURCE_TAG
        };

        for raw in &rows {
            incoming += 1;
            let fallback_id = index * ID_STRIDE + seen.len() + 1;
            let record = normalize_vendor_row(raw, fallback_id, source_tag);
            if record.is_blank() {
                continue;
            }
            let key = record.key();
            if seen.contains_key(&key) {
                duplicates += 1;
                continue;
            }
            seen.insert(key, record);
        }
    }

    if readable == 0 {
        return Err(ListingsError::NoInputs);
    }

    let unique = seen.len();
    let mut records: Vec<VendorRecord> = seen.into_values().collect();
    records.sort_by(|a, b| {
        a.row
            .name
            .to_lowercase()
            .cmp(&b.row.name.to_lowercase())
            .then_with(|| a.row.name.cmp(&b.row.name))
            .then_with(|| a.row.website.cmp(&b.row.website))
    });
    let lines: Vec<String> = records.iter().map(|record| record.row.to_line()).collect();
    write_csv(&options.output, &LISTING_COLUMNS, &lines)?;

    Ok(VendorListReport {
        output: options.output.clone(),
        mode: options.mode,
        sources: inputs,
        incoming,
        unique,
        duplicates,
    })
}

#[cfg(test)]
#[path = "vendor_list_test.rs"]
mod tests;
