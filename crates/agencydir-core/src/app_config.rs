use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_level: String,
    pub listings_path: PathBuf,
    pub staging_dir: PathBuf,
    pub query_file: PathBuf,
    pub vendor_master_path: PathBuf,
    pub scraper_user_agent: String,
    /// Per-request timeout for search-engine result pages.
    pub search_timeout_secs: u64,
    /// Per-request timeout for a candidate homepage.
    pub page_timeout_secs: u64,
    /// Per-request timeout for follow-up contact/about pages.
    pub link_timeout_secs: u64,
    pub max_contact_links: usize,
    pub max_concurrent_fetches: usize,
}
