//! Integration tests for `SiteScraper::scrape`.
//!
//! Every test stands up its own `wiremock` server acting as the restaurant
//! site and the search endpoints. Paths without a mounted mock answer 404,
//! which the scraper treats as a missing subpage.

use std::net::TcpListener;
use std::time::Duration;

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sitescout_scraper::{ScraperOptions, SiteScraper};

const TEST_USER_AGENT: &str = "sitescout-test/0.1";

fn options_for(server: &MockServer) -> ScraperOptions {
    ScraperOptions {
        user_agent: TEST_USER_AGENT.to_string(),
        primary_timeout: Duration::from_secs(2),
        subpage_timeout: Duration::from_secs(2),
        cache_ttl: Duration::ZERO,
        opentable_search_url: format!("{}/s", server.uri()),
        web_search_url: format!("{}/html/", server.uri()),
    }
}

fn test_scraper(server: &MockServer) -> SiteScraper {
    SiteScraper::new(&options_for(server)).expect("failed to build test SiteScraper")
}

async fn mount_page(server: &MockServer, route: &str, html: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(html.into()))
        .mount(server)
        .await;
}

fn page(body: &str) -> String {
    format!("<html><head><title>Parc</title></head><body>{body}</body></html>")
}

const HOME_COPY: &str =
    "<main><p>Parc is a Parisian bistro on Rittenhouse Square serving French classics.</p></main>";

// ---------------------------------------------------------------------------
// Home-page failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn home_page_timeout_reports_timeout_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page(HOME_COPY))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let scraper = SiteScraper::new(&ScraperOptions {
        primary_timeout: Duration::from_millis(200),
        ..options_for(&server)
    })
    .expect("failed to build test SiteScraper");
    let result = scraper.scrape(&server.uri(), None).await;

    assert!(!result.ok);
    assert_eq!(
        result.error,
        "Website took too long to respond. Please try again."
    );
    assert!(result.text.is_empty());
}

#[tokio::test]
async fn refused_connection_reports_connect_message() {
    // Bind an ephemeral port, then release it so nothing is listening there.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        listener.local_addr().expect("listener address").port()
    };
    let uri = format!("http://127.0.0.1:{port}");

    let scraper = SiteScraper::new(&ScraperOptions::default()).expect("default options build");
    let result = scraper.scrape(&uri, None).await;

    assert!(!result.ok);
    assert_eq!(
        result.error,
        "Could not connect to website. Please check the URL."
    );
}

#[tokio::test]
async fn home_page_error_status_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = test_scraper(&server).scrape(&server.uri(), None).await;

    assert!(!result.ok);
    assert_eq!(
        result.error,
        "Website returned error 503. Please verify the URL."
    );
    assert!(result.detected.is_empty());
}

#[tokio::test]
async fn requests_carry_configured_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", TEST_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(HOME_COPY)))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_scraper(&server).scrape(&server.uri(), None).await;
    assert!(result.ok, "expected ok, got: {result:?}");
}

// ---------------------------------------------------------------------------
// Content thresholds and assembly
// ---------------------------------------------------------------------------

#[tokio::test]
async fn corpus_of_49_chars_is_too_little_content() {
    let server = MockServer::start().await;
    // "[HOME PAGE]\n" is 12 chars, so 37 chars of copy makes 49.
    mount_page(&server, "/", page(&format!("<p>{}</p>", "x".repeat(37)))).await;

    let result = test_scraper(&server).scrape(&server.uri(), None).await;

    assert!(!result.ok);
    assert_eq!(
        result.error,
        "Website had very little text content. Try a different page or enter copy manually."
    );
}

#[tokio::test]
async fn corpus_of_51_chars_is_accepted() {
    let server = MockServer::start().await;
    mount_page(&server, "/", page(&format!("<p>{}</p>", "x".repeat(39)))).await;

    let result = test_scraper(&server).scrape(&server.uri(), None).await;

    assert!(result.ok, "expected ok, got: {result:?}");
    assert_eq!(result.text.chars().count(), 51);
    assert!(result.text.starts_with("[HOME PAGE]\n"));
    assert!(result.error.is_empty());
}

#[tokio::test]
async fn subpage_text_survives_truncation() {
    let server = MockServer::start().await;
    let subpage_copy = "s".repeat(7000);
    mount_page(&server, "/", page(&format!("<main>{}</main>", "h".repeat(3000)))).await;
    mount_page(&server, "/about/", page(&format!("<main>{subpage_copy}</main>"))).await;

    let result = test_scraper(&server).scrape(&server.uri(), None).await;

    assert!(result.ok, "expected ok, got error: {}", result.error);
    assert_eq!(result.text.chars().count(), 8000);
    assert!(result.text.starts_with("[ABOUT]\n"));
    assert!(result.text.contains(&subpage_copy));
    assert!(result.text.contains("[HOME PAGE]\n"));
}

#[tokio::test]
async fn short_subpages_are_left_out_of_the_corpus() {
    let server = MockServer::start().await;
    mount_page(&server, "/", page(HOME_COPY)).await;
    mount_page(&server, "/menu/", page("<main>Coming soon</main>")).await;
    mount_page(
        &server,
        "/private-dining/",
        page("<main>Our salon seats up to 40 guests for private parties.</main>"),
    )
    .await;

    let result = test_scraper(&server).scrape(&server.uri(), None).await;

    assert!(result.ok);
    assert!(!result.text.contains("[MENU]"));
    assert!(result
        .text
        .starts_with("[PRIVATE DINING]\nOur salon seats up to 40 guests"));
}

// ---------------------------------------------------------------------------
// Metadata merge across pages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn booking_is_gap_filled_from_subpage() {
    let server = MockServer::start().await;
    mount_page(&server, "/", page(HOME_COPY)).await;
    mount_page(
        &server,
        "/about/",
        page(
            r#"<main>Reserve below.</main>
            <script src="https://widgets.resy.com/embed.js"></script>
            <a href="https://resy.com/cities/phl/venues/parc">Book on Resy</a>"#,
        ),
    )
    .await;

    let result = test_scraper(&server).scrape(&server.uri(), None).await;

    assert!(result.ok);
    assert_eq!(result.detected.booking, "Resy");
    assert_eq!(
        result.detected.resy_url,
        "https://resy.com/cities/phl/venues/parc"
    );
}

#[tokio::test]
async fn home_page_values_are_never_overwritten() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        page(&format!(
            r#"{HOME_COPY}
            <footer>
                <a href="mailto:parc.info@starr-restaurant.com">Email</a>
                <a href="tel:+1-215-545-2262">215.545.2262</a>
                <a href="https://www.instagram.com/starrrestaurants/">Starr</a>
            </footer>"#
        )),
    )
    .await;
    mount_page(
        &server,
        "/about/",
        page(
            r#"<main>Contact</main>
            <a href="mailto:other.info@starr-restaurant.com">Email</a>
            <a href="mailto:parc.events@starr-restaurant.com">Events</a>
            <a href="https://www.instagram.com/parc_philly/">Instagram</a>"#,
        ),
    )
    .await;

    let result = test_scraper(&server).scrape(&server.uri(), None).await;

    assert!(result.ok);
    assert_eq!(
        result.detected.email_general,
        "parc.info@starr-restaurant.com"
    );
    assert_eq!(
        result.detected.email_events,
        "parc.events@starr-restaurant.com"
    );
    assert_eq!(result.detected.phone, "(215) 545-2262");
    assert_eq!(
        result.detected.instagram_url,
        "https://www.instagram.com/parc_philly"
    );
}

#[tokio::test]
async fn assets_resolve_against_post_redirect_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/home/"))
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/home/",
        format!(
            r##"<html><head>
                <meta name="theme-color" content="#C8102E">
                <link rel="apple-touch-icon" href="touch.png">
            </head><body>
                <header><img class="header-logo" src="img/logo.png"></header>
                {HOME_COPY}
            </body></html>"##
        ),
    )
    .await;

    let uri = server.uri();
    let result = test_scraper(&server).scrape(&uri, None).await;

    assert!(result.ok);
    assert_eq!(result.detected.primary_color, "#c8102e");
    assert_eq!(result.detected.logo_url, format!("{uri}/home/img/logo.png"));
    assert_eq!(result.detected.favicon_url, format!("{uri}/home/touch.png"));
}

// ---------------------------------------------------------------------------
// Fallback searches
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fallback_searches_backfill_missing_identifiers() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        page(&format!(
            r#"{HOME_COPY}<a href="https://www.opentable.com/r/parc-philadelphia">Reserve</a>"#
        )),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("term", "Parc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<script>{"restaurantId": 105211, "name": "Parc"}</script>"#),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .and(query_param("q", "Parc starr site:resy.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fresy.com%2Fcities%2Fphl%2Fnew">x</a>
               <a href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fresy.com%2Fcities%2Fphl%2Fvenues%2Fparc">Parc</a>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_scraper(&server).scrape(&server.uri(), Some("Parc")).await;

    assert!(result.ok);
    assert_eq!(result.detected.booking, "OpenTable");
    assert_eq!(result.detected.opentable_rid, "105211");
    assert_eq!(
        result.detected.resy_url,
        "https://resy.com/cities/phl/venues/parc"
    );
}

#[tokio::test]
async fn fallback_searches_are_skipped_without_a_name() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        page(&format!(
            r#"{HOME_COPY}<a href="https://www.opentable.com/r/parc-philadelphia">Reserve</a>"#
        )),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = test_scraper(&server).scrape(&server.uri(), None).await;

    assert!(result.ok);
    assert_eq!(result.detected.opentable_rid, "");
}

#[tokio::test]
async fn failed_fallback_search_leaves_field_empty() {
    let server = MockServer::start().await;
    mount_page(&server, "/", page(HOME_COPY)).await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_scraper(&server).scrape(&server.uri(), Some("Parc")).await;

    assert!(result.ok);
    assert_eq!(result.detected.resy_url, "");
}

// ---------------------------------------------------------------------------
// Result cache
// ---------------------------------------------------------------------------

#[tokio::test]
async fn repeated_scrape_is_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(HOME_COPY)))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = SiteScraper::new(&ScraperOptions {
        cache_ttl: Duration::from_secs(300),
        ..options_for(&server)
    })
    .expect("failed to build test SiteScraper");

    let first = scraper.scrape(&server.uri(), None).await;
    let second = scraper.scrape(&server.uri(), None).await;

    assert!(first.ok);
    assert_eq!(first, second);
}

#[tokio::test]
async fn failures_are_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let scraper = SiteScraper::new(&ScraperOptions {
        cache_ttl: Duration::from_secs(300),
        ..options_for(&server)
    })
    .expect("failed to build test SiteScraper");

    assert!(!scraper.scrape(&server.uri(), None).await.ok);
    assert!(!scraper.scrape(&server.uri(), None).await.ok);
}
