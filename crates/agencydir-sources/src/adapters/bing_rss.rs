//! Bing RSS search adapter.

use std::collections::HashSet;
use std::sync::Arc;

use agencydir_core::{CandidateRaw, SearchQuery};
use async_trait::async_trait;

use super::SourceAdapter;
use crate::client::{build_search_url, SourceClient};
use crate::details::fetch_website_details;
use crate::error::SourceError;
use crate::filter::retain_business_candidates;
use crate::rss::{parse_rss_items, RssItem};
use crate::url::canonical_result_url;

const KEY: &str = "bing";
const REFERER: &str = "https://www.bing.com/";
const DEFAULT_KEYWORDS: &str =
    "(\"automation agency\" OR \"marketing automation agency\" OR \"zapier partner\")";

const SITE_EXCLUDES: &str = "-site:clutch.co -site:goodfirms.com -site:sortlist.com \
    -site:fiverr.com -site:upwork.com -site:trustpilot.com -site:g2.com -site:capterra.com \
    -site:softwareadvice.com -site:yellowpages.com -site:linkedin.com -site:github.com";

/// Reads Bing web results through its `format=rss` feed.
pub struct BingRssSource {
    client: Arc<SourceClient>,
}

impl BingRssSource {
    #[must_use]
    pub fn new(client: Arc<SourceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceAdapter for BingRssSource {
    fn key(&self) -> &'static str {
        KEY
    }

    fn display_name(&self) -> &'static str {
        "Bing RSS Search"
    }

    async fn discover(
        &self,
        query: &SearchQuery,
        max_results: usize,
    ) -> Result<Vec<CandidateRaw>, SourceError> {
        let search_url = build_search_url(
            &self.client.endpoints().bing_search,
            &search_terms(query),
            &[("format", "rss")],
        )?;
        let response = self.client.get_search(&search_url, Some(REFERER)).await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                source = KEY,
                query = %query.query,
                status = status.as_u16(),
                "search returned non-2xx, no results this round"
            );
            return Ok(Vec::new());
        }

        let xml = response.text().await?;
        let items = parse_rss_items(&xml, max_results)?;
        Ok(retain_business_candidates(
            candidates_from_items(items, query),
            KEY,
        ))
    }

    async fn fetch_details(&self, candidate: CandidateRaw) -> CandidateRaw {
        fetch_website_details(&self.client, candidate).await
    }
}

fn search_terms(query: &SearchQuery) -> String {
    let keywords = if query.platforms.is_empty() {
        DEFAULT_KEYWORDS.to_string()
    } else {
        format!("({})", query.platforms.join(" OR "))
    };
    format!(
        "{} {} {keywords} {SITE_EXCLUDES}",
        query.query,
        query.country.as_deref().unwrap_or("")
    )
    .trim()
    .to_string()
}

fn candidates_from_items(items: Vec<RssItem>, query: &SearchQuery) -> Vec<CandidateRaw> {
    let mut seen: HashSet<String> = HashSet::new();
    items
        .into_iter()
        .filter_map(|item| {
            let website = canonical_result_url(&item.link)?;
            if !seen.insert(website.clone()) {
                return None;
            }
            Some(CandidateRaw {
                source: KEY.to_string(),
                discovered_name: if item.title.is_empty() {
                    "Unknown".to_string()
                } else {
                    item.title
                },
                discovered_website: website,
                source_ref: item.link,
                snippet: Some(item.description).filter(|d| !d.is_empty()),
                country: query.country.clone(),
                platforms: query.platforms.clone(),
                query: Some(query.clone()),
                ..CandidateRaw::default()
            })
        })
        .collect()
}
