//! Integration tests for `extract_primary_color` stylesheet handling.
//!
//! A local `wiremock` server stands in for the site so stylesheet requests
//! can be counted.

use std::time::Duration;

use reqwest::Url;
use scraper::Html;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sitescout_scraper::constants::MAX_STYLESHEET_BYTES;
use sitescout_scraper::{extract_primary_color, ColorSignals, PageFetcher};

fn test_fetcher() -> PageFetcher {
    PageFetcher::new(
        "sitescout-test/0.1",
        Duration::from_secs(2),
        Duration::from_secs(2),
    )
    .expect("failed to build test PageFetcher")
}

async fn primary_color_for(html: &str, server: &MockServer) -> String {
    let signals = ColorSignals::from_document(&Html::parse_document(html));
    let base = Url::parse(&format!("{}/", server.uri())).expect("mock uri parses");
    extract_primary_color(&test_fetcher(), &signals, &base).await
}

#[tokio::test]
async fn inline_color_seen_three_times_skips_stylesheet_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/main.css"))
        .respond_with(ResponseTemplate::new(200).set_body_string(":root{--brand:#0000ff}"))
        .expect(0)
        .mount(&server)
        .await;

    let html = r#"<html><head>
        <link rel="stylesheet" href="/main.css">
        <style>h1{color:#c8102e} a{color:#c8102e} .btn{background:#c8102e}</style>
    </head></html>"#;
    assert_eq!(primary_color_for(html, &server).await, "#c8102e");
}

#[tokio::test]
async fn external_custom_property_found_after_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/theme.css"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(":root{--color-primary:#336699} a{color:#ff0000}"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let html = r#"<html><head><link rel="stylesheet" href="theme.css"></head></html>"#;
    assert_eq!(primary_color_for(html, &server).await, "#336699");
}

#[tokio::test]
async fn failing_stylesheet_does_not_abort_extraction() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken.css"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ok.css"))
        .respond_with(ResponseTemplate::new(200).set_body_string("a{color:#228b22}"))
        .mount(&server)
        .await;

    let html = r#"<html><head>
        <link rel="stylesheet" href="/broken.css">
        <link rel="stylesheet" href="/ok.css">
    </head></html>"#;
    assert_eq!(primary_color_for(html, &server).await, "#228b22");
}

#[tokio::test]
async fn theme_color_wins_without_any_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("a{color:#ff0000}"))
        .expect(0)
        .mount(&server)
        .await;

    let html = r##"<html><head>
        <meta name="theme-color" content="#0B5">
        <link rel="stylesheet" href="/main.css">
    </head></html>"##;
    assert_eq!(primary_color_for(html, &server).await, "#00bb55");
}

#[tokio::test]
async fn no_color_signals_yield_empty() {
    let server = MockServer::start().await;
    let html = "<html><head><style>body{color:#333;background:#fafafa}</style></head></html>";
    assert_eq!(primary_color_for(html, &server).await, "");
}

const BRAND_RULE: &str = ":root{--brand-primary:#c8102e}";

async fn mount_stylesheet(server: &MockServer, css: String) {
    Mock::given(method("GET"))
        .and(path("/big.css"))
        .respond_with(ResponseTemplate::new(200).set_body_string(css))
        .expect(1)
        .mount(server)
        .await;
}

const BIG_SHEET_HTML: &str =
    r#"<html><head><link rel="stylesheet" href="/big.css"></head></html>"#;

#[tokio::test]
async fn stylesheet_bytes_past_the_cap_are_ignored() {
    let server = MockServer::start().await;
    let css = format!("{}{BRAND_RULE}", " ".repeat(MAX_STYLESHEET_BYTES));
    mount_stylesheet(&server, css).await;

    assert_eq!(primary_color_for(BIG_SHEET_HTML, &server).await, "");
}

#[tokio::test]
async fn stylesheet_bytes_just_inside_the_cap_are_read() {
    let server = MockServer::start().await;
    let lead = MAX_STYLESHEET_BYTES - BRAND_RULE.len() - 1;
    let css = format!("{}{BRAND_RULE}{}", " ".repeat(lead), " ".repeat(200_000));
    mount_stylesheet(&server, css).await;

    assert_eq!(primary_color_for(BIG_SHEET_HTML, &server).await, "#c8102e");
}
