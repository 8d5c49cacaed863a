//! `scrape` command handler.

use anyhow::Context;
use sitescout_core::{AppConfig, ScrapeResult};
use sitescout_scraper::{ScraperOptions, SiteScraper};

/// Runs one scrape and prints the [`ScrapeResult`] to stdout.
///
/// A scrape that comes back with `ok == false` is still printed; only
/// client setup and serialisation failures are errors here.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    url: &str,
    restaurant_name: Option<&str>,
    compact: bool,
) -> anyhow::Result<()> {
    let scraper = SiteScraper::new(&ScraperOptions::from(config))
        .context("failed to build site scraper")?;

    let result = scraper.scrape(url, restaurant_name).await;
    if !result.ok {
        tracing::warn!(url, error = %result.error, "scrape did not succeed");
    }
    println!("{}", render(&result, compact)?);
    Ok(())
}

fn render(result: &ScrapeResult, compact: bool) -> anyhow::Result<String> {
    let json = if compact {
        serde_json::to_string(result)?
    } else {
        serde_json::to_string_pretty(result)?
    };
    Ok(json)
}
