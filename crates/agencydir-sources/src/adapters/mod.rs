//! Source adapter abstraction and the registry of known adapters.

mod bing_rss;
mod duckduckgo;
mod seed;

use std::sync::Arc;

use agencydir_core::{CandidateRaw, SearchQuery};
use async_trait::async_trait;

pub use bing_rss::BingRssSource;
pub use duckduckgo::DuckDuckGoSource;
pub use seed::SeedSource;

use crate::client::SourceClient;
use crate::error::SourceError;

/// A search backend that discovers candidates and enriches them.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Stable key used on the command line (`--source`).
    fn key(&self) -> &'static str;

    fn display_name(&self) -> &'static str;

    /// Up to `max_results` candidates for `query`, deduplicated by website
    /// and with directory results removed.
    ///
    /// A non-2xx search response yields `Ok(vec![])`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on network failures or malformed feeds.
    async fn discover(
        &self,
        query: &SearchQuery,
        max_results: usize,
    ) -> Result<Vec<CandidateRaw>, SourceError>;

    /// Enrich a candidate with website verification signals. Never fails.
    async fn fetch_details(&self, candidate: CandidateRaw) -> CandidateRaw;
}

/// Known adapters, in registration order.
pub struct SourceRegistry {
    adapters: Vec<Arc<dyn SourceAdapter>>,
}

impl SourceRegistry {
    #[must_use]
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>) -> Self {
        Self { adapters }
    }

    /// `duckduckgo`, `bing` and `seed` sharing one HTTP client.
    #[must_use]
    pub fn with_defaults(client: Arc<SourceClient>) -> Self {
        Self::new(vec![
            Arc::new(DuckDuckGoSource::new(Arc::clone(&client))),
            Arc::new(BingRssSource::new(client)),
            Arc::new(SeedSource),
        ])
    }

    /// Keys of every registered adapter.
    #[must_use]
    pub fn available(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.key()).collect()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<dyn SourceAdapter>> {
        self.adapters.iter().find(|a| a.key() == key).cloned()
    }

    /// Adapters for the requested names, in request order.
    ///
    /// Names are trimmed and lowercased; unknown names and repeats are skipped.
    #[must_use]
    pub fn resolve(&self, names: &[String]) -> Vec<Arc<dyn SourceAdapter>> {
        let mut resolved: Vec<Arc<dyn SourceAdapter>> = Vec::new();
        for name in names {
            let key = name.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            match self.get(&key) {
                Some(adapter) if !resolved.iter().any(|a| a.key() == adapter.key()) => {
                    resolved.push(adapter);
                }
                Some(_) => {}
                None => tracing::warn!(source = %key, "unknown source adapter, skipping"),
            }
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SourceRegistry {
        let config = agencydir_core::load_app_config_from_env().unwrap();
        let client = Arc::new(SourceClient::new(&config).unwrap());
        SourceRegistry::with_defaults(client)
    }

    #[test]
    fn available_lists_all_keys() {
        assert_eq!(registry().available(), vec!["duckduckgo", "bing", "seed"]);
    }

    #[test]
    fn resolve_keeps_request_order_and_skips_unknown() {
        let names: Vec<String> = ["seed", " Bing ", "google", "seed"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        let keys: Vec<&str> = registry()
            .resolve(&names)
            .iter()
            .map(|a| a.key())
            .collect();
        assert_eq!(keys, vec!["seed", "bing"]);
    }

    #[test]
    fn resolve_with_only_unknown_names_is_empty() {
        assert!(registry().resolve(&["google".to_string()]).is_empty());
    }
}
