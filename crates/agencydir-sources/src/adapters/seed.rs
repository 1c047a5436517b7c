//! Offline adapter that manufactures placeholder candidates.

use agencydir_core::{CandidateRaw, SearchQuery};
use async_trait::async_trait;

use super::SourceAdapter;
use crate::error::SourceError;

const KEY: &str = "seed";
const MAX_SEEDS: usize = 3;

/// One `"{PLATFORM} Partner"` candidate per query platform, no network.
pub struct SeedSource;

#[async_trait]
impl SourceAdapter for SeedSource {
    fn key(&self) -> &'static str {
        KEY
    }

    fn display_name(&self) -> &'static str {
        "Manual Seed URLs"
    }

    async fn discover(
        &self,
        query: &SearchQuery,
        max_results: usize,
    ) -> Result<Vec<CandidateRaw>, SourceError> {
        Ok(query
            .platforms
            .iter()
            .filter(|p| !p.trim().is_empty())
            .take(MAX_SEEDS.min(max_results))
            .map(|platform| CandidateRaw {
                source: KEY.to_string(),
                discovered_name: format!("{} Partner", platform.to_uppercase()),
                discovered_website: String::new(),
                source_ref: query.query.clone(),
                country: query.country.clone(),
                platforms: vec![platform.clone()],
                query: Some(query.clone()),
                ..CandidateRaw::default()
            })
            .collect())
    }

    async fn fetch_details(&self, candidate: CandidateRaw) -> CandidateRaw {
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn discover_caps_at_three_platforms() {
        let query = SearchQuery {
            query: "automation partners".to_string(),
            country: Some("DE".to_string()),
            platforms: ["zapier", "make", "", "n8n", "ai"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        };
        let candidates = SeedSource.discover(&query, 100).await.unwrap();
        let names: Vec<&str> = candidates
            .iter()
            .map(|c| c.discovered_name.as_str())
            .collect();
        assert_eq!(names, vec!["ZAPIER Partner", "MAKE Partner", "N8N Partner"]);
        assert!(candidates.iter().all(|c| c.discovered_website.is_empty()));
        assert_eq!(candidates[0].source_ref, "automation partners");
        assert_eq!(candidates[2].platforms, vec!["n8n"]);
    }

    #[tokio::test]
    async fn fetch_details_is_identity() {
        let candidate = CandidateRaw {
            discovered_name: "ZAPIER Partner".to_string(),
            ..CandidateRaw::default()
        };
        assert_eq!(SeedSource.fetch_details(candidate.clone()).await, candidate);
    }
}
