//! Third-party lookups that backfill identifiers a site does not expose.
//!
//! Both searches are single-shot and silent: any transport error, non-200
//! response or missing pattern yields an empty string.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use reqwest::Url;

use crate::constants::CORPORATE_SEARCH_QUALIFIER;
use crate::error::ScraperError;
use crate::fetch::PageFetcher;
use crate::metadata::extract_resy_venue_url;

static RESTAURANT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""restaurantId"\s*:\s*(\d+)"#).expect("valid regex"));

/// Search endpoints used by the fallbacks.
#[derive(Debug, Clone)]
pub struct FallbackSearch {
    opentable_search_url: Url,
    web_search_url: Url,
}

impl FallbackSearch {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if either endpoint does not parse.
    pub fn new(opentable_search_url: &str, web_search_url: &str) -> Result<Self, ScraperError> {
        Ok(Self {
            opentable_search_url: parse_endpoint(opentable_search_url)?,
            web_search_url: parse_endpoint(web_search_url)?,
        })
    }

    /// Looks up the OpenTable restaurant ID for `restaurant_name` on
    /// OpenTable's own search page.
    pub async fn search_opentable_rid(&self, fetcher: &PageFetcher, restaurant_name: &str) -> String {
        let mut url = self.opentable_search_url.clone();
        url.query_pairs_mut().append_pair("term", restaurant_name);

        let Some(body) = fetcher.fetch_ok_text(url).await else {
            return String::new();
        };
        let rid = RESTAURANT_ID_RE
            .captures(&body)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_owned())
            .unwrap_or_default();
        tracing::debug!(restaurant_name, rid = %rid, "opentable rid search finished");
        rid
    }

    /// Finds the Resy venue page for `restaurant_name` through a web search
    /// restricted to resy.com.
    pub async fn search_resy_url(&self, fetcher: &PageFetcher, restaurant_name: &str) -> String {
        let query = format!("{restaurant_name} {CORPORATE_SEARCH_QUALIFIER} site:resy.com");
        let mut url = self.web_search_url.clone();
        url.query_pairs_mut().append_pair("q", &query);

        let Some(body) = fetcher.fetch_ok_text(url).await else {
            return String::new();
        };
        // Result links are usually redirect URLs with the target percent-encoded.
        let decoded = percent_decode_str(&body).decode_utf8_lossy();
        let resy_url = extract_resy_venue_url(&decoded).unwrap_or_default();
        tracing::debug!(restaurant_name, resy_url = %resy_url, "resy url search finished");
        resy_url
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, ScraperError> {
    Url::parse(raw).map_err(|e| ScraperError::InvalidUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_endpoints() {
        let err = FallbackSearch::new("not a url", "https://html.duckduckgo.com/html/")
            .expect_err("should reject");
        assert!(matches!(err, ScraperError::InvalidUrl { .. }));
    }

    #[test]
    fn restaurant_id_pattern_tolerates_spacing() {
        let body = r#"{"restaurants":[{"restaurantId" : 105211,"name":"Parc"}]}"#;
        let rid = RESTAURANT_ID_RE
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());
        assert_eq!(rid, Some("105211"));
    }
}
