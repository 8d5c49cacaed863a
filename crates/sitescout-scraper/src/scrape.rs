//! Scrape orchestration: home page, subpages, metadata merge and corpus.

use std::collections::BTreeSet;
use std::time::Duration;

use reqwest::Url;
use scraper::Html;
use sitescout_core::app_config::{
    DEFAULT_OPENTABLE_SEARCH_URL, DEFAULT_USER_AGENT, DEFAULT_WEB_SEARCH_URL,
};
use sitescout_core::{AppConfig, BookingPlatform, DetectedFields, ScrapeResult};

use crate::cache::ScrapeCache;
use crate::color::{extract_primary_color, ColorSignals};
use crate::constants::{MAX_SUBPAGES, MAX_TEXT_CHARS, MIN_CORPUS_CHARS, MIN_SUBPAGE_TEXT_CHARS};
use crate::error::ScraperError;
use crate::fetch::{normalize_scheme, FetchedPage, PageFetcher};
use crate::logo::{extract_favicon_url, extract_logo_url};
use crate::metadata::extract_site_metadata;
use crate::search::FallbackSearch;
use crate::subpages::{discover_subpages, path_label};
use crate::text::{assemble_corpus, extract_body_text, truncate_chars};

/// Runtime knobs for [`SiteScraper`].
#[derive(Debug, Clone)]
pub struct ScraperOptions {
    pub user_agent: String,
    pub primary_timeout: Duration,
    /// Applies to subpages, stylesheets and fallback searches.
    pub subpage_timeout: Duration,
    /// Zero disables the result cache.
    pub cache_ttl: Duration,
    pub opentable_search_url: String,
    pub web_search_url: String,
}

impl Default for ScraperOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            primary_timeout: Duration::from_secs(10),
            subpage_timeout: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(300),
            opentable_search_url: DEFAULT_OPENTABLE_SEARCH_URL.to_string(),
            web_search_url: DEFAULT_WEB_SEARCH_URL.to_string(),
        }
    }
}

impl From<&AppConfig> for ScraperOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.scraper_user_agent.clone(),
            primary_timeout: Duration::from_secs(config.scraper_primary_timeout_secs),
            subpage_timeout: Duration::from_secs(config.scraper_subpage_timeout_secs),
            cache_ttl: Duration::from_secs(config.scraper_cache_ttl_secs),
            opentable_search_url: config.opentable_search_url.clone(),
            web_search_url: config.web_search_url.clone(),
        }
    }
}

/// Everything needed from the parsed home page, reduced to owned data so
/// nothing borrowed from the DOM is held across an `.await`.
struct HomeSnapshot {
    color_signals: ColorSignals,
    logo_url: String,
    favicon_url: String,
    subpages: BTreeSet<String>,
    body_text: String,
}

impl HomeSnapshot {
    fn parse(page: &FetchedPage) -> Self {
        let document = Html::parse_document(&page.html());
        Self {
            color_signals: ColorSignals::from_document(&document),
            logo_url: extract_logo_url(&document, &page.final_url),
            favicon_url: extract_favicon_url(&document, &page.final_url),
            subpages: discover_subpages(&document, &page.final_url),
            body_text: extract_body_text(&document),
        }
    }
}

/// Body text and metadata of one subpage.
fn read_subpage(page: &FetchedPage) -> (String, DetectedFields) {
    let document = Html::parse_document(&page.html());
    (extract_body_text(&document), extract_site_metadata(&page.body, &page.final_url))
}

/// Restaurant-website scraper.
///
/// Requests are issued one at a time; a scrape costs at most one home-page
/// fetch, [`MAX_SUBPAGES`] subpage fetches, one fetch per external
/// stylesheet and two fallback searches.
pub struct SiteScraper {
    fetcher: PageFetcher,
    search: FallbackSearch,
    cache: ScrapeCache,
}

impl SiteScraper {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built, or
    /// [`ScraperError::InvalidUrl`] if a search endpoint does not parse.
    pub fn new(options: &ScraperOptions) -> Result<Self, ScraperError> {
        Ok(Self {
            fetcher: PageFetcher::new(
                &options.user_agent,
                options.primary_timeout,
                options.subpage_timeout,
            )?,
            search: FallbackSearch::new(&options.opentable_search_url, &options.web_search_url)?,
            cache: ScrapeCache::new(options.cache_ttl),
        })
    }

    /// Scrapes `url`, adding `https://` when the scheme is missing.
    ///
    /// `restaurant_name` enables the OpenTable and Resy fallback searches.
    /// Never fails: home-page failures and thin content come back as
    /// `ok == false` with a user-facing message.
    pub async fn scrape(&self, url: &str, restaurant_name: Option<&str>) -> ScrapeResult {
        let url = normalize_scheme(url);
        let restaurant_name = restaurant_name.map(str::trim).filter(|n| !n.is_empty());
        let cache_key = ScrapeCache::key(&url, restaurant_name);

        if let Some(cached) = self.cache.get(&cache_key) {
            tracing::info!(url = %url, "scrape cache hit");
            return cached;
        }

        tracing::info!(url = %url, "scrape started");
        match self.run(&url, restaurant_name).await {
            Ok(result) => {
                tracing::info!(url = %url, chars = result.text.chars().count(), "scrape finished");
                self.cache.insert(cache_key, result.clone());
                result
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "scrape failed");
                ScrapeResult::failure(e.user_message())
            }
        }
    }

    async fn run(
        &self,
        url: &str,
        restaurant_name: Option<&str>,
    ) -> Result<ScrapeResult, ScraperError> {
        let home = self.fetcher.fetch_primary(url).await?;
        let base_url: &Url = &home.final_url;
        let snapshot = HomeSnapshot::parse(&home);

        let mut detected = extract_site_metadata(&home.body, base_url);
        detected.primary_color =
            extract_primary_color(&self.fetcher, &snapshot.color_signals, base_url).await;
        detected.logo_url = snapshot.logo_url;
        detected.favicon_url = snapshot.favicon_url;

        let mut subpage_parts: Vec<(String, String)> = Vec::new();
        for sub_url in snapshot.subpages.iter().take(MAX_SUBPAGES) {
            let Some(page) = self.fetcher.fetch_subpage(sub_url).await else {
                continue;
            };
            let (text, found) = read_subpage(&page);
            let filled = detected.fill_missing(&found);
            if !filled.is_empty() {
                tracing::debug!(url = %sub_url, ?filled, "gap-filled fields from subpage");
            }
            if text.chars().count() > MIN_SUBPAGE_TEXT_CHARS {
                subpage_parts.push((path_label(sub_url), text));
            }
        }

        let corpus = assemble_corpus(&subpage_parts, &snapshot.body_text);
        let chars = corpus.chars().count();
        if chars < MIN_CORPUS_CHARS {
            return Err(ScraperError::InsufficientContent {
                chars,
                url: url.to_owned(),
            });
        }

        if let Some(name) = restaurant_name {
            self.backfill_identifiers(&mut detected, name).await;
        }

        Ok(ScrapeResult::success(
            truncate_chars(&corpus, MAX_TEXT_CHARS),
            detected,
        ))
    }

    /// Runs the fallback searches for identifiers the site did not expose.
    /// A search result never changes the detected booking platform.
    async fn backfill_identifiers(&self, detected: &mut DetectedFields, restaurant_name: &str) {
        if detected.booking == BookingPlatform::OpenTable.as_str()
            && detected.opentable_rid.is_empty()
        {
            detected.opentable_rid = self
                .search
                .search_opentable_rid(&self.fetcher, restaurant_name)
                .await;
        }
        if detected.resy_url.is_empty() {
            detected.resy_url = self
                .search
                .search_resy_url(&self.fetcher, restaurant_name)
                .await;
        }
    }
}
