//! Candidate website scraping for verification signals.

use agencydir_core::{CandidateRaw, VerificationSignals, WebsiteStatus};

use crate::client::{is_html_response, SourceClient};
use crate::html::{collect_contact_links, extract_page_details, PageDetails};
use crate::url::canonical_result_url;

/// Fetch a candidate homepage plus its contact/about pages and attach signals.
///
/// Never fails: non-2xx responses become `http_<code>`, non-HTML bodies
/// `non_html`, and network errors or timeouts `error`, each with every
/// evidence flag false. Follow-up pages that fail are skipped.
pub async fn fetch_website_details(client: &SourceClient, candidate: CandidateRaw) -> CandidateRaw {
    let fetch_url = candidate.discovered_website.trim().to_string();
    let email_known = candidate.known_email().is_some();

    if fetch_url.is_empty() {
        return with_signals(
            candidate,
            VerificationSignals::unreachable(WebsiteStatus::Missing, email_known),
        );
    }

    let response = match client.get_homepage(&fetch_url).await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!(url = %fetch_url, error = %e, "homepage fetch failed");
            return with_signals(
                candidate,
                VerificationSignals::unreachable(WebsiteStatus::Error, email_known),
            );
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::debug!(url = %fetch_url, status = status.as_u16(), "homepage returned non-2xx");
        return with_signals(
            candidate,
            VerificationSignals::unreachable(WebsiteStatus::Http(status.as_u16()), email_known),
        );
    }
    if !is_html_response(&response) {
        return with_signals(
            candidate,
            VerificationSignals::unreachable(WebsiteStatus::NonHtml, email_known),
        );
    }

    let page_url = response.url().to_string();
    let html = match response.text().await {
        Ok(html) => html,
        Err(e) => {
            tracing::debug!(url = %fetch_url, error = %e, "homepage body read failed");
            return with_signals(
                candidate,
                VerificationSignals::unreachable(WebsiteStatus::Error, email_known),
            );
        }
    };

    let homepage = extract_page_details(&html);
    let mut signals = VerificationSignals {
        website_status_code: Some(status.as_u16()),
        ..homepage.signals.clone()
    };
    let mut email = candidate
        .known_email()
        .map(str::to_string)
        .or_else(|| homepage.email.clone());

    for link in collect_contact_links(&page_url, &html, client.max_contact_links()) {
        let Some(extra) = fetch_linked_page(client, &link).await else {
            continue;
        };
        signals = signals.merge(&extra.signals);
        if email.is_none() {
            email = extra.email;
        }
    }
    signals.email_from_source = email.is_some();

    let discovered_name = if candidate.has_placeholder_name() {
        homepage
            .title
            .clone()
            .unwrap_or_else(|| "Unknown".to_string())
    } else {
        candidate.discovered_name.clone()
    };
    let snippet = candidate
        .snippet
        .clone()
        .filter(|s| !s.trim().is_empty())
        .or(homepage.description);

    CandidateRaw {
        discovered_name,
        snippet,
        email,
        ..with_signals(candidate, signals)
    }
}

async fn fetch_linked_page(client: &SourceClient, url: &str) -> Option<PageDetails> {
    let response = match client.get_linked_page(url).await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!(url, error = %e, "contact page fetch failed");
            return None;
        }
    };
    if !response.status().is_success() || !is_html_response(&response) {
        return None;
    }
    let html = response.text().await.ok()?;
    Some(extract_page_details(&html))
}

/// Attach signals, canonicalize the website and backfill `source_ref`.
fn with_signals(candidate: CandidateRaw, signals: VerificationSignals) -> CandidateRaw {
    let website =
        canonical_result_url(&candidate.discovered_website).unwrap_or_else(|| {
            candidate.discovered_website.trim().to_string()
        });
    let source_ref = if candidate.source_ref.trim().is_empty() {
        candidate.discovered_website.clone()
    } else {
        candidate.source_ref.clone()
    };
    CandidateRaw {
        discovered_website: website,
        source_ref,
        verification_signals: Some(signals),
        ..candidate
    }
}
