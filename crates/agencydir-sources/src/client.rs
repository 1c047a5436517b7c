use std::time::Duration;

use agencydir_core::AppConfig;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, REFERER};
use reqwest::{Client, Response};

use crate::error::SourceError;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_EN: &str = "en-US,en;q=0.9";

/// Search endpoints used by the network adapters.
///
/// Overridable so integration tests can point adapters at a mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEndpoints {
    pub duckduckgo_html: String,
    pub bing_search: String,
}

impl Default for SourceEndpoints {
    fn default() -> Self {
        Self {
            duckduckgo_html: "https://duckduckgo.com/html/".to_string(),
            bing_search: "https://www.bing.com/search".to_string(),
        }
    }
}

/// Shared HTTP client for search requests and candidate page fetches.
///
/// Timeouts are applied per request: search pages, candidate homepages and
/// follow-up contact/about pages each have their own budget.
#[derive(Debug, Clone)]
pub struct SourceClient {
    client: Client,
    endpoints: SourceEndpoints,
    search_timeout: Duration,
    page_timeout: Duration,
    link_timeout: Duration,
    max_contact_links: usize,
}

impl SourceClient {
    /// Build a client from pipeline configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(config.scraper_user_agent.as_str())
            .connect_timeout(Duration::from_secs(config.page_timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            client,
            endpoints: SourceEndpoints::default(),
            search_timeout: Duration::from_secs(config.search_timeout_secs),
            page_timeout: Duration::from_secs(config.page_timeout_secs),
            link_timeout: Duration::from_secs(config.link_timeout_secs),
            max_contact_links: config.max_contact_links,
        })
    }

    #[must_use]
    pub fn with_endpoints(mut self, endpoints: SourceEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    #[must_use]
    pub fn endpoints(&self) -> &SourceEndpoints {
        &self.endpoints
    }

    #[must_use]
    pub fn max_contact_links(&self) -> usize {
        self.max_contact_links
    }

    /// GET a search-engine results page.
    pub(crate) async fn get_search(
        &self,
        url: &str,
        referer: Option<&'static str>,
    ) -> Result<Response, SourceError> {
        let mut request = self
            .client
            .get(url)
            .timeout(self.search_timeout)
            .header(ACCEPT, ACCEPT_HTML);
        if let Some(referer) = referer {
            request = request.header(REFERER, referer);
        }
        Ok(request.send().await?)
    }

    /// GET a candidate homepage.
    pub(crate) async fn get_homepage(&self, url: &str) -> Result<Response, reqwest::Error> {
        self.client
            .get(url)
            .timeout(self.page_timeout)
            .header(ACCEPT, ACCEPT_HTML)
            .header(ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_EN)
            .send()
            .await
    }

    /// GET a follow-up contact/about page.
    pub(crate) async fn get_linked_page(&self, url: &str) -> Result<Response, reqwest::Error> {
        self.client
            .get(url)
            .timeout(self.link_timeout)
            .header(ACCEPT, ACCEPT_HTML)
            .send()
            .await
    }
}

/// Build `{base}?q={query}` plus any extra parameters, percent-encoding values.
///
/// # Errors
///
/// Returns [`SourceError::InvalidUrl`] if `base` is not an absolute URL.
pub(crate) fn build_search_url(
    base: &str,
    query: &str,
    extra: &[(&str, &str)],
) -> Result<String, SourceError> {
    reqwest::Url::parse(base).map_err(|e| SourceError::InvalidUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })?;

    let mut url = format!("{base}?q={}", utf8_percent_encode(query, NON_ALPHANUMERIC));
    for (key, value) in extra {
        url.push('&');
        url.push_str(key);
        url.push('=');
        url.push_str(&utf8_percent_encode(value, NON_ALPHANUMERIC).to_string());
    }
    Ok(url)
}

/// `true` when the response declares an HTML or XHTML body.
pub(crate) fn is_html_response(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_ascii_lowercase)
        .is_some_and(|ct| ct.contains("text/html") || ct.contains("application/xhtml+xml"))
}
