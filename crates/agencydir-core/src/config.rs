use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; partner-discovery/1.0; +https://automationagencydirectory.com)";

/// Load pipeline configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric variable cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric variable cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// Every variable has a default, so the only failure mode is a value that
/// does not parse as the expected number.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("AGENCYDIR_LOG_LEVEL", "info");
    let listings_path = PathBuf::from(or_default("AGENCYDIR_LISTINGS_PATH", "data/listings.csv"));
    let staging_dir = PathBuf::from(or_default("AGENCYDIR_STAGING_DIR", "data/staging"));
    let query_file = PathBuf::from(or_default(
        "AGENCYDIR_QUERY_FILE",
        "data/partner-queries.sample.json",
    ));
    let vendor_master_path = PathBuf::from(or_default(
        "AGENCYDIR_VENDOR_MASTER_PATH",
        "data/vendor-list-master.csv",
    ));
    let scraper_user_agent = or_default("AGENCYDIR_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);

    let search_timeout_secs = parse_u64("AGENCYDIR_SEARCH_TIMEOUT_SECS", "12")?;
    let page_timeout_secs = parse_u64("AGENCYDIR_PAGE_TIMEOUT_SECS", "10")?;
    let link_timeout_secs = parse_u64("AGENCYDIR_LINK_TIMEOUT_SECS", "9")?;
    let max_contact_links = parse_usize("AGENCYDIR_MAX_CONTACT_LINKS", "3")?;
    let max_concurrent_fetches = parse_usize("AGENCYDIR_MAX_CONCURRENT_FETCHES", "1")?;

    if max_concurrent_fetches == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "AGENCYDIR_MAX_CONCURRENT_FETCHES".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        log_level,
        listings_path,
        staging_dir,
        query_file,
        vendor_master_path,
        scraper_user_agent,
        search_timeout_secs,
        page_timeout_secs,
        link_timeout_secs,
        max_contact_links,
        max_concurrent_fetches,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
