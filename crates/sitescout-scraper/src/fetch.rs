//! Bounded-timeout page fetching.
//!
//! The home page is fetched with [`PageFetcher::fetch_primary`], which
//! classifies failures for the caller. Everything else (subpages,
//! stylesheets, search pages) goes through best-effort helpers that log
//! and return `None`.

use std::borrow::Cow;
use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::ScraperError;

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub body: Vec<u8>,
    /// URL after redirects. All relative links on the page resolve against this.
    pub final_url: Url,
}

impl FetchedPage {
    /// Body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn html(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// HTTP client wrapper carrying the fixed `User-Agent` and both timeouts.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    primary_timeout: Duration,
    subpage_timeout: Duration,
}

impl PageFetcher {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        user_agent: &str,
        primary_timeout: Duration,
        subpage_timeout: Duration,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            primary_timeout,
            subpage_timeout,
        })
    }

    /// Fetches the home page, classifying any failure.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `url` does not parse.
    /// - [`ScraperError::Timeout`] / [`ScraperError::Connect`] on transport failure.
    /// - [`ScraperError::UnexpectedStatus`] for any non-2xx response.
    /// - [`ScraperError::Http`] for anything else.
    pub async fn fetch_primary(&self, url: &str) -> Result<FetchedPage, ScraperError> {
        self.fetch(url, self.primary_timeout).await
    }

    /// Fetches a subpage. Failures are logged at debug and swallowed.
    pub async fn fetch_subpage(&self, url: &str) -> Option<FetchedPage> {
        match self.fetch(url, self.subpage_timeout).await {
            Ok(page) => Some(page),
            Err(e) => {
                tracing::debug!(url, error = %e, "subpage fetch failed");
                None
            }
        }
    }

    /// Streams a text resource, keeping at most `max_bytes` of the body.
    pub async fn fetch_capped(&self, url: &str, max_bytes: usize) -> Option<String> {
        let mut response = match self
            .client
            .get(url)
            .timeout(self.subpage_timeout)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => resp,
            Ok(resp) => {
                tracing::debug!(url, status = resp.status().as_u16(), "capped fetch non-2xx");
                return None;
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "capped fetch failed");
                return None;
            }
        };

        let mut buf: Vec<u8> = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    let remaining = max_bytes.saturating_sub(buf.len());
                    buf.extend_from_slice(&chunk[..chunk.len().min(remaining)]);
                    if buf.len() >= max_bytes {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!(url, error = %e, "capped fetch body read failed");
                    return None;
                }
            }
        }

        Some(String::from_utf8_lossy(&buf).into_owned())
    }

    /// GETs `url` with the subpage timeout and returns the body only for a
    /// `200 OK` response.
    pub(crate) async fn fetch_ok_text(&self, url: Url) -> Option<String> {
        let shown = url.to_string();
        let response = match self
            .client
            .get(url)
            .timeout(self.subpage_timeout)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::debug!(url = %shown, error = %e, "search request failed");
                return None;
            }
        };
        if response.status() != reqwest::StatusCode::OK {
            tracing::debug!(
                url = %shown,
                status = response.status().as_u16(),
                "search request returned non-200"
            );
            return None;
        }
        response.text().await.ok()
    }

    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, ScraperError> {
        let parsed = Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .get(parsed)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| ScraperError::from_transport(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let final_url = response.url().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| ScraperError::from_transport(e, url))?;

        Ok(FetchedPage {
            body: body.to_vec(),
            final_url,
        })
    }
}

/// Prepends `https://` when the user-supplied URL has no scheme.
#[must_use]
pub fn normalize_scheme(url: &str) -> String {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    }
}

/// Scheme + host (+ port) of `url`, without a trailing slash.
#[must_use]
pub fn site_origin(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Resolves `candidate` against `base`, decoding `&amp;` first.
pub(crate) fn absolutize_url(base: &Url, candidate: &str) -> Option<String> {
    let candidate = candidate.trim().replace("&amp;", "&");
    if candidate.is_empty() {
        return None;
    }
    base.join(&candidate).ok().map(|u| u.to_string())
}
