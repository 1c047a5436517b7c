//! DuckDuckGo HTML search adapter.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use agencydir_core::{CandidateRaw, SearchQuery};
use async_trait::async_trait;
use regex::Regex;

use super::SourceAdapter;
use crate::client::{build_search_url, SourceClient};
use crate::details::fetch_website_details;
use crate::error::SourceError;
use crate::filter::retain_business_candidates;
use crate::html::{clean_text, decode_entities};
use crate::url::{canonical_result_url, unwrap_search_redirect};

const KEY: &str = "duckduckgo";
const MAX_SNIPPETS: usize = 400;

const SITE_EXCLUDES: &str = "-site:clutch.co -site:goodfirms.com -site:sortlist.com \
    -site:fiverr.com -site:upwork.com -site:trustpilot.com -site:g2.com -site:capterra.com \
    -site:softwareadvice.com -site:yellowpages.com";

static RESULT_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a[^>]*class="[^"]*result__a[^"]*"[^>]*href="([^"]+)"[^>]*>(.*?)</a>"#)
        .expect("valid regex")
});
static RESULT_SNIPPET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)class="result__snippet"[^>]*>(.*?)</(?:a|p|div)>"#).expect("valid regex")
});

/// Scrapes `duckduckgo.com/html/` result pages.
pub struct DuckDuckGoSource {
    client: Arc<SourceClient>,
}

impl DuckDuckGoSource {
    #[must_use]
    pub fn new(client: Arc<SourceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceAdapter for DuckDuckGoSource {
    fn key(&self) -> &'static str {
        KEY
    }

    fn display_name(&self) -> &'static str {
        "DuckDuckGo HTML Search"
    }

    async fn discover(
        &self,
        query: &SearchQuery,
        max_results: usize,
    ) -> Result<Vec<CandidateRaw>, SourceError> {
        let search_url = build_search_url(
            &self.client.endpoints().duckduckgo_html,
            &search_terms(query),
            &[],
        )?;
        let response = self.client.get_search(&search_url, None).await?;
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

        let html = response.text().await?;
        let candidates = parse_results(&html, max_results)
            .into_iter()
            .map(|candidate| CandidateRaw {
                country: query.country.clone(),
                platforms: query.platforms.clone(),
                query: Some(query.clone()),
                ..candidate
            })
            .collect();
        Ok(retain_business_candidates(candidates, KEY))
    }

    async fn fetch_details(&self, candidate: CandidateRaw) -> CandidateRaw {
        fetch_website_details(&self.client, candidate).await
    }
}

fn search_terms(query: &SearchQuery) -> String {
    format!(
        "{} {} \"automation partner\" {SITE_EXCLUDES}",
        query.query,
        query.country.as_deref().unwrap_or("")
    )
    .trim()
    .to_string()
}

/// Result anchors and snippets from a DuckDuckGo HTML page.
///
/// Snippets pair with anchors by position. Redirect links are unwrapped and
/// websites canonicalized; repeats of a website are dropped.
fn parse_results(html: &str, max_results: usize) -> Vec<CandidateRaw> {
    let snippets: Vec<String> = RESULT_SNIPPET_RE
        .captures_iter(html)
        .take(MAX_SNIPPETS)
        .map(|cap| clean_text(&decode_entities(cap.get(1).map_or("", |m| m.as_str()))))
        .collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut results = Vec::new();
    for (index, cap) in RESULT_LINK_RE.captures_iter(html).enumerate() {
        if results.len() >= max_results {
            break;
        }
        let raw_href = decode_entities(cap.get(1).map_or("", |m| m.as_str()));
        let name = clean_text(&decode_entities(cap.get(2).map_or("", |m| m.as_str())));
        let target = unwrap_search_redirect(&raw_href);
        let Some(website) = canonical_result_url(&target) else {
            continue;
        };
        if !seen.insert(website.clone()) {
            continue;
        }

        results.push(CandidateRaw {
            source: KEY.to_string(),
            discovered_name: if name.is_empty() {
                "Unknown".to_string()
            } else {
                name
            },
            discovered_website: website,
            source_ref: target,
            snippet: snippets.get(index).filter(|s| !s.is_empty()).cloned(),
            ..CandidateRaw::default()
        });
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<div class="result">
  <h2><a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.acme.io%2F&amp;rut=1">Acme <b>Automations</b></a></h2>
  <a class="result__snippet" href="x">Zapier &amp; Make automation partner</a>
</div>
<div class="result">
  <h2><a rel="nofollow" class="result__a" href="https://acme.io">Acme again</a></h2>
  <a class="result__snippet" href="x">Duplicate</a>
</div>
<div class="result">
  <h2><a rel="nofollow" class="result__a" href="https://flowline.ai/">Flowline</a></h2>
  <a class="result__snippet" href="x">n8n studio</a>
</div>
"#;

    #[test]
    fn search_terms_include_country_and_excludes() {
        let query = SearchQuery {
            query: "zapier experts".to_string(),
            country: Some("Germany".to_string()),
            platforms: vec![],
        };
        let terms = search_terms(&query);
        assert!(terms.starts_with("zapier experts Germany \"automation partner\" -site:clutch.co"));
        assert!(terms.ends_with("-site:yellowpages.com"));
    }

    #[test]
    fn parse_results_unwraps_and_dedupes() {
        let results = parse_results(PAGE, 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].discovered_name, "Acme Automations");
        assert_eq!(results[0].discovered_website, "https://acme.io");
        assert_eq!(results[0].source_ref, "https://www.acme.io/");
        assert_eq!(
            results[0].snippet.as_deref(),
            Some("Zapier & Make automation partner")
        );
        assert_eq!(results[1].discovered_website, "https://flowline.ai");
        assert_eq!(results[1].snippet.as_deref(), Some("n8n studio"));
    }

    #[test]
    fn parse_results_honours_max_results() {
        assert_eq!(parse_results(PAGE, 1).len(), 1);
        assert!(parse_results("<html></html>", 5).is_empty());
    }
}
