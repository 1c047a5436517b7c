//! `build-vendor-list` command handler.

use std::path::PathBuf;

use agencydir_core::AppConfig;
use agencydir_listings::{build_vendor_list, VendorListMode, VendorListOptions};
use anyhow::Context;
use clap::Args;

#[derive(Debug, Args)]
pub struct VendorListArgs {
    /// Output master CSV path (defaults to AGENCYDIR_VENDOR_MASTER_PATH)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Base listings CSV path (defaults to AGENCYDIR_LISTINGS_PATH)
    #[arg(long)]
    pub base: Option<PathBuf>,

    /// Staging directory (defaults to AGENCYDIR_STAGING_DIR)
    #[arg(long)]
    pub staging_dir: Option<PathBuf>,

    /// Merge the existing master with the --new files only
    #[arg(long)]
    pub append: bool,

    /// Comma-separated candidate CSVs to merge in append mode
    #[arg(long = "new", value_delimiter = ',')]
    pub new_files: Vec<PathBuf>,

    /// Do not include staging/*.csv in a full build
    #[arg(long)]
    pub no_staging: bool,

    /// Read at most N rows from each input
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_dry_run: Option<u32>,
}

impl VendorListArgs {
    pub(crate) fn to_options(&self, config: &AppConfig) -> VendorListOptions {
        VendorListOptions {
            output: self
                .output
                .clone()
                .unwrap_or_else(|| config.vendor_master_path.clone()),
            base: self
                .base
                .clone()
                .unwrap_or_else(|| config.listings_path.clone()),
            staging_dir: self
                .staging_dir
                .clone()
                .unwrap_or_else(|| config.staging_dir.clone()),
            mode: if self.append {
                VendorListMode::Append
            } else {
                VendorListMode::Full
            },
            new_files: self
                .new_files
                .iter()
                .filter(|p| !p.as_os_str().is_empty())
                .cloned()
                .collect(),
            include_staging: !self.no_staging,
            max_rows: self.max_dry_run.map(|n| n as usize),
        }
    }
}

/// Build the vendor master list and print a `[vendor-list]` report.
///
/// # Errors
///
/// Returns an error in append mode without `--new` files or when the
/// output cannot be written.
pub(crate) fn run_build_vendor_list(
    config: &AppConfig,
    args: &VendorListArgs,
) -> anyhow::Result<()> {
    let options = args.to_options(config);
    let report = build_vendor_list(&options).context("building vendor list failed")?;

    let sources: Vec<String> = report
        .sources
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    println!("[vendor-list] output: {}", report.output.display());
    println!("[vendor-list] mode: {}", report.mode.as_str());
    println!("[vendor-list] sources: {}", sources.join(", "));
    println!("[vendor-list] incoming rows: {}", report.incoming);
    println!("[vendor-list] unique rows: {}", report.unique);
    println!("[vendor-list] duplicate skipped: {}", report.duplicates);
    Ok(())
}
