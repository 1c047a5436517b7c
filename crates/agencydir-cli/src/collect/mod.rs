//! `collect-partners` command handler.
//!
//! Discovery and detail-fetch failures are logged and treated as empty or
//! degraded results so one bad source or website never aborts the run. Only
//! configuration and artifact I/O errors are fatal.

mod artifacts;
mod runner;
mod summary;

use std::path::PathBuf;
use std::sync::Arc;

use agencydir_core::{load_queries, AppConfig, NormalizedPartner, SearchQuery, VerificationMode};
use agencydir_listings::{read_existing_listings, sort_for_staging, DedupLedger, StagingRow};
use agencydir_sources::{SourceAdapter, SourceClient, SourceRegistry};
use agencydir_verify::{default_min_score, DEFAULT_MIN_SCORE};
use anyhow::Context;
use clap::Args;

use self::artifacts::ArtifactPaths;
use self::runner::{classify_candidates, discover_candidates, ClassifySettings, DiscoveryLimits};
use self::summary::{build_run_summary, RunHeader, RunSummary};

const VERBOSE_PREVIEW: usize = 30;

#[derive(Debug, Args)]
pub struct CollectArgs {
    /// Comma-separated source adapters: duckduckgo, bing, seed
    #[arg(long = "source", value_delimiter = ',', default_value = "duckduckgo")]
    pub sources: Vec<String>,

    /// Query template file (defaults to AGENCYDIR_QUERY_FILE)
    #[arg(long)]
    pub query_file: Option<PathBuf>,

    /// Total cap on discovered candidates
    #[arg(long, default_value_t = 5000, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_results: u32,

    /// Cap on candidates per source
    #[arg(long, default_value_t = 2000, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit_per_source: u32,

    /// strict, moderate or lenient
    #[arg(long, default_value = "strict")]
    pub verification_mode: VerificationMode,

    /// Acceptance threshold, 0-200 (default depends on the mode)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=200))]
    pub min_score: Option<u32>,

    /// Require a valid e-mail address (default)
    #[arg(long, overrides_with = "no_require_email")]
    pub require_email: bool,

    /// Allow candidates without an e-mail address
    #[arg(long, overrides_with = "require_email")]
    pub no_require_email: bool,

    /// Write staging CSV and summary files (default)
    #[arg(long, overrides_with = "no_write_staging")]
    pub write_staging: bool,

    /// Skip writing staging files
    #[arg(long, overrides_with = "write_staging")]
    pub no_write_staging: bool,

    /// Never append to the listings file
    #[arg(long)]
    pub dry_run: bool,

    /// Append accepted candidates to the listings file
    #[arg(long)]
    pub append_to_listings: bool,

    /// Print a preview of candidate summaries
    #[arg(long)]
    pub verbose: bool,
}

impl CollectArgs {
    pub(crate) fn requires_email(&self) -> bool {
        !self.no_require_email
    }

    pub(crate) fn writes_staging(&self) -> bool {
        !self.no_write_staging
    }

    pub(crate) fn appends(&self) -> bool {
        self.append_to_listings && !self.dry_run
    }

    /// The explicit `--min-score`, or the mode default.
    pub(crate) fn effective_min_score(&self) -> u32 {
        self.min_score
            .unwrap_or_else(|| default_min_score(self.verification_mode, DEFAULT_MIN_SCORE))
    }
}

/// Run discovery, verification, dedup and artifact writing.
///
/// # Errors
///
/// Returns an error if the query file cannot be loaded or is empty, no
/// requested source is known, the HTTP client cannot be built, or an
/// artifact cannot be written.
pub(crate) async fn run_collect_partners(
    config: &AppConfig,
    args: &CollectArgs,
) -> anyhow::Result<()> {
    let query_file = args.query_file.clone().unwrap_or_else(|| config.query_file.clone());
    let queries = load_queries(&query_file)?;
    if queries.is_empty() {
        anyhow::bail!("no queries loaded from {}", query_file.display());
    }

    let client = Arc::new(SourceClient::new(config).context("failed to build HTTP client")?);
    let registry = SourceRegistry::with_defaults(client);
    let adapters = registry.resolve(&args.sources);
    if adapters.is_empty() {
        anyhow::bail!(
            "no valid source adapters in --source. Available: {}",
            registry.available().join(", ")
        );
    }

    let outcome = collect_with_adapters(config, args, &queries, &adapters).await?;
    print_report(config, args, &outcome);
    Ok(())
}

/// What a finished run produced.
pub(crate) struct CollectOutcome {
    pub summary: RunSummary,
    pub paths: ArtifactPaths,
}

/// The run itself, against already resolved adapters.
pub(crate) async fn collect_with_adapters(
    config: &AppConfig,
    args: &CollectArgs,
    queries: &[SearchQuery],
    adapters: &[Arc<dyn SourceAdapter>],
) -> anyhow::Result<CollectOutcome> {
    let started_at = chrono::Utc::now();
    let source_keys: Vec<String> = adapters.iter().map(|a| a.key().to_string()).collect();

    let snapshot = read_existing_listings(&config.listings_path);
    let mut ledger = DedupLedger::new(snapshot);

    let limits = DiscoveryLimits {
        max_results: args.max_results as usize,
        limit_per_source: args.limit_per_source as usize,
    };
    let candidates =
        discover_candidates(adapters, queries, limits, config.max_concurrent_fetches).await;

    let settings = ClassifySettings {
        min_score: args.effective_min_score(),
        mode: args.verification_mode,
        require_email: args.requires_email(),
    };
    let run = classify_candidates(&candidates, &settings, &mut ledger);

    let mut accepted: Vec<&NormalizedPartner> =
        run.partners.iter().filter(|p| p.is_accepted()).collect();
    sort_for_staging(&mut accepted);

    let paths = ArtifactPaths::new(&config.staging_dir, &artifacts::run_timestamp(started_at));
    let header = RunHeader {
        started_at,
        sources: source_keys,
        max_results: args.max_results,
        limit_per_source: args.limit_per_source,
        verification_mode: settings.mode,
        min_score: settings.min_score,
        require_email: settings.require_email,
        total_discovered: candidates.len(),
        appended: if args.appends() { accepted.len() } else { 0 },
        staging_file: if args.writes_staging() {
            paths.staging_csv.display().to_string()
        } else {
            String::new()
        },
    };
    let summary = build_run_summary(header, &run);

    if args.writes_staging() {
        let rows: Vec<StagingRow> = accepted
            .iter()
            .map(|p| StagingRow::from_partner(p, p.assigned_id.unwrap_or(0)))
            .collect();
        artifacts::write_staging_csv(&paths.staging_csv, &rows)?;
        artifacts::write_summary_json(&paths.summary_json, &summary)?;
    }

    if args.appends() {
        let appended = artifacts::append_to_listings(&config.listings_path, &accepted)?;
        tracing::info!(
            appended,
            path = %config.listings_path.display(),
            "appended accepted partners"
        );
    }

    Ok(CollectOutcome { summary, paths })
}

fn print_report(config: &AppConfig, args: &CollectArgs, outcome: &CollectOutcome) {
    let summary = &outcome.summary;
    println!("[collect-partners] done");
    println!("[collect-partners] source: {}", summary.sources.join(", "));
    println!(
        "[collect-partners] discovered={}, accepted={}, pending_review={}, rejected={}",
        summary.total_discovered, summary.accepted, summary.pending_review, summary.rejected
    );
    let gate = &summary.quality_gate;
    println!(
        "[collect-partners] qualityGate: withEmail={}, validatedWebsite={}, blockedByDomain={}, avgVerificationScore={}",
        gate.with_email, gate.validated_website, gate.blocked_by_domain, gate.avg_verification_score
    );
    if args.writes_staging() {
        println!("[collect-partners] staging: {}", outcome.paths.staging_csv.display());
        println!("[collect-partners] summary: {}", outcome.paths.summary_json.display());
    }
    if args.appends() {
        println!(
            "[collect-partners] appended to {}: {}",
            config.listings_path.display(),
            summary.appended
        );
    }

    if args.verbose {
        for entry in summary.candidates.iter().take(VERBOSE_PREVIEW) {
            println!("{} | {}", entry.status, entry.summary);
        }
        if summary.candidates.len() > VERBOSE_PREVIEW {
            println!(
                "[collect-partners] ... and {} more",
                summary.candidates.len() - VERBOSE_PREVIEW
            );
        }
    }
}

#[cfg(test)]
#[path = "collect_test.rs"]
mod tests;
