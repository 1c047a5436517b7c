//! Integration tests for candidate website scraping.
//!
//! Each test stands up a `wiremock` server playing the candidate website.

use std::path::PathBuf;

use agencydir_core::{AppConfig, CandidateRaw, VerificationSignals, WebsiteStatus};
use agencydir_sources::{fetch_website_details, SourceClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config() -> AppConfig {
    AppConfig {
        log_level: "debug".to_string(),
        listings_path: PathBuf::from("listings.csv"),
        staging_dir: PathBuf::from("staging"),
        query_file: PathBuf::from("queries.json"),
        vendor_master_path: PathBuf::from("vendor-list-master.csv"),
        scraper_user_agent: "agencydir-test/0.1".to_string(),
        search_timeout_secs: 2,
        page_timeout_secs: 2,
        link_timeout_secs: 2,
        max_contact_links: 3,
        max_concurrent_fetches: 1,
    }
}

fn test_client() -> SourceClient {
    SourceClient::new(&test_config()).expect("failed to build test SourceClient")
}

fn candidate(website: &str) -> CandidateRaw {
    CandidateRaw {
        source: "duckduckgo".to_string(),
        discovered_name: "Unknown".to_string(),
        discovered_website: website.to_string(),
        source_ref: String::new(),
        ..CandidateRaw::default()
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html; charset=utf-8")
}

#[tokio::test]
async fn homepage_and_contact_page_signals_are_merged() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><head><title>Acme Automations</title>
            <meta name="description" content="Zapier automation agency"></head>
            <body>We build workflow automations. <a href="/contact">Reach out</a></body></html>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(html(
            r#"<html><body>Contact us: <a href="mailto:ops@acme.io">ops@acme.io</a></body></html>"#,
        ))
        .mount(&server)
        .await;

    let enriched = fetch_website_details(&test_client(), candidate(&server.uri())).await;
    let signals = enriched.verification_signals.expect("signals attached");

    assert_eq!(enriched.discovered_name, "Acme Automations");
    assert_eq!(enriched.snippet.as_deref(), Some("Zapier automation agency"));
    assert_eq!(enriched.email.as_deref(), Some("ops@acme.io"));
    assert!(signals.website_ok);
    assert_eq!(signals.website_status, WebsiteStatus::Ok);
    assert!(signals.automation_signal, "homepage keyword");
    assert!(signals.contact_signal, "contact page keyword");
    assert!(signals.mailto_signal);
    assert!(signals.email_from_source);
    assert_eq!(enriched.source_ref, server.uri());
}

#[tokio::test]
async fn discovered_name_and_email_take_precedence() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            "<title>Homepage Title</title><p>write to hello@other.io</p>",
        ))
        .mount(&server)
        .await;

    let mut input = candidate(&server.uri());
    input.discovered_name = "Flowline Studio".to_string();
    input.email = Some("team@flowline.ai".to_string());

    let enriched = fetch_website_details(&test_client(), input).await;
    assert_eq!(enriched.discovered_name, "Flowline Studio");
    assert_eq!(enriched.email.as_deref(), Some("team@flowline.ai"));
}

#[tokio::test]
async fn non_2xx_homepage_yields_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let enriched = fetch_website_details(&test_client(), candidate(&server.uri())).await;
    let signals = enriched.verification_signals.expect("signals attached");

    assert_eq!(signals.website_status, WebsiteStatus::Http(404));
    assert_eq!(signals.website_status.to_string(), "http_404");
    assert_eq!(signals.website_status_code, Some(404));
    assert_eq!(
        signals,
        VerificationSignals::unreachable(WebsiteStatus::Http(404), false)
    );
}

#[tokio::test]
async fn non_html_homepage_yields_non_html() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string(r#"{"contact": "ops@acme.io"}"#),
        )
        .mount(&server)
        .await;

    let enriched = fetch_website_details(&test_client(), candidate(&server.uri())).await;
    let signals = enriched.verification_signals.expect("signals attached");

    assert_eq!(signals.website_status, WebsiteStatus::NonHtml);
    assert_eq!(
        signals,
        VerificationSignals::unreachable(WebsiteStatus::NonHtml, false)
    );
    assert_eq!(enriched.email, None);
}

#[tokio::test]
async fn failing_contact_page_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<title>Acme</title><p>automation services</p><a href="/about-us">About</a>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about-us"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let enriched = fetch_website_details(&test_client(), candidate(&server.uri())).await;
    let signals = enriched.verification_signals.expect("signals attached");

    assert!(signals.website_ok);
    assert!(signals.services_signal);
    assert!(!signals.email_from_source);
}

#[tokio::test]
async fn unreachable_host_yields_error_without_panicking() {
    // Port 9 (discard) on localhost is not served by the test harness.
    let enriched = fetch_website_details(&test_client(), candidate("http://127.0.0.1:9")).await;
    let signals = enriched.verification_signals.expect("signals attached");

    assert_eq!(signals.website_status, WebsiteStatus::Error);
    assert_eq!(
        signals,
        VerificationSignals::unreachable(WebsiteStatus::Error, false)
    );
}

#[tokio::test]
async fn missing_website_is_not_fetched() {
    let enriched = fetch_website_details(&test_client(), candidate("")).await;
    let signals = enriched.verification_signals.expect("signals attached");
    assert_eq!(signals.website_status, WebsiteStatus::Missing);
}
