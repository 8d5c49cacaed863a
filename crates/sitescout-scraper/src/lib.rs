//! Restaurant-website metadata extraction and text scraping.
//!
//! [`SiteScraper::scrape`] fetches a home page and up to ten same-site
//! subpages, detects brand and contact metadata, and assembles a text
//! corpus for downstream copy generation.

pub mod cache;
mod chain;
pub mod color;
pub mod constants;
pub mod error;
pub mod fetch;
pub mod logo;
pub mod metadata;
pub mod scrape;
pub mod search;
pub mod subpages;
pub mod text;

pub use cache::ScrapeCache;
pub use color::{extract_primary_color, normalize_hex, ColorSignals};
pub use error::ScraperError;
pub use fetch::{normalize_scheme, FetchedPage, PageFetcher};
pub use logo::{extract_favicon_url, extract_logo_url};
pub use metadata::extract_site_metadata;
pub use scrape::{ScraperOptions, SiteScraper};
pub use search::FallbackSearch;
pub use subpages::discover_subpages;
