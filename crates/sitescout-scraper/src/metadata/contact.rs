//! Phone, corporate e-mail, address, mailing-list and order-online links.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use scraper::{Html, Selector};

use crate::chain::{first_candidate, BorrowedStage};
use crate::constants::CORPORATE_EMAIL_DOMAIN;
use crate::fetch::absolutize_url;

const MAILING_LIST_PHRASES: [&str; 4] = ["mailing list", "subscribe", "newsletter", "sign up for"];

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));
static LABELLED_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[aria-label], [title]").expect("valid selector"));

static PHONE_SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?1[\s.-]*)?\(?\d{3}\)?[\s.-]*\d{3}[\s.-]*\d{4}").expect("valid regex")
});
static PHONE_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)phone:(.{0,60})").expect("valid regex"));
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b([a-z0-9._%+-]+)@{CORPORATE_EMAIL_DOMAIN}\b"))
        .expect("valid regex")
});
static MAPS_PLACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)google\.[a-z.]+/maps/place").expect("valid regex"));
static NEWSLETTER_VENDOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)https?://[a-z0-9.-]*(?:list-manage\.com|eepurl\.com|mailchi\.mp|constantcontact\.com|klaviyo\.com|mailerlite\.com|substack\.com)[^"'\s<>]*"#,
    )
    .expect("valid regex")
});
static ORDER_ONLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://(?:www\.)?order\.online/[^"'\s<>]*"#).expect("valid regex")
});

/// Raw page text plus its parsed DOM and the URL it was served from.
pub(crate) struct PageText<'a> {
    pub html: &'a str,
    pub document: &'a Html,
    pub base_url: &'a Url,
}

/// Corporate-domain addresses bucketed by local-part suffix.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct CorporateEmails {
    pub general: String,
    pub events: String,
    pub marketing: String,
    pub press: String,
}

/// US phone number as `(NNN) NNN-NNNN`.
///
/// Tries `tel:` links, then `aria-label` / `title` attributes, then a
/// `Phone:` label in the raw markup. Numbers that do not reduce to exactly
/// ten digits are dropped.
pub(crate) fn extract_phone(page: &PageText<'_>) -> Option<String> {
    let stages: [BorrowedStage<'_, PageText<'_>>; 3] =
        [&tel_link_phone, &labelled_phone, &phone_label_phone];
    first_candidate(&stages, page)
}

fn tel_link_phone(page: &PageText<'_>) -> Option<String> {
    page.document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter_map(|href| {
            let (scheme, number) = href.split_at_checked(4)?;
            scheme.eq_ignore_ascii_case("tel:").then_some(number)
        })
        .find_map(format_us_phone)
}

fn labelled_phone(page: &PageText<'_>) -> Option<String> {
    page.document
        .select(&LABELLED_SELECTOR)
        .flat_map(|el| [el.value().attr("aria-label"), el.value().attr("title")])
        .flatten()
        .find_map(phone_in)
}

fn phone_label_phone(page: &PageText<'_>) -> Option<String> {
    PHONE_LABEL_RE
        .captures_iter(page.html)
        .filter_map(|caps| caps.get(1))
        .find_map(|window| phone_in(window.as_str()))
}

fn phone_in(text: &str) -> Option<String> {
    PHONE_SHAPE_RE
        .find_iter(text)
        .find_map(|m| format_us_phone(m.as_str()))
}

/// Strips `raw` to digits, drops a leading country code `1` from an
/// 11-digit number, and formats exactly ten digits.
pub(crate) fn format_us_phone(raw: &str) -> Option<String> {
    let mut digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 11 && digits.starts_with('1') {
        digits.remove(0);
    }
    if digits.len() != 10 {
        return None;
    }
    Some(format!(
        "({}) {}-{}",
        &digits[..3],
        &digits[3..6],
        &digits[6..]
    ))
}

/// Corporate e-mail addresses in `html`, lowercased; the first match per
/// bucket wins.
pub(crate) fn extract_corporate_emails(html: &str) -> CorporateEmails {
    let mut emails = CorporateEmails::default();
    for m in EMAIL_RE.find_iter(html) {
        let address = m.as_str().to_ascii_lowercase();
        let Some((local, _)) = address.split_once('@') else {
            continue;
        };
        let slot = if local.ends_with(".info") {
            &mut emails.general
        } else if local.ends_with(".events") {
            &mut emails.events
        } else if local.ends_with(".marketing") {
            &mut emails.marketing
        } else if local.ends_with(".press") {
            &mut emails.press
        } else {
            continue;
        };
        if slot.is_empty() {
            *slot = address;
        }
    }
    emails
}

/// `(address, google_maps_url)` from the first anchor pointing at a Google
/// Maps place. The anchor's text pieces are comma-joined into the address.
pub(crate) fn extract_address(document: &Html) -> Option<(String, String)> {
    document.select(&ANCHOR_SELECTOR).find_map(|a| {
        let href = a.value().attr("href")?.trim();
        if !MAPS_PLACE_RE.is_match(href) {
            return None;
        }
        let address = a
            .text()
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        Some((address, href.to_owned()))
    })
}

/// Newsletter signup link.
///
/// Anchor text is the primary signal, with relative hrefs resolved against
/// the page URL; known newsletter vendor URLs anywhere in the markup are the
/// fallback.
pub(crate) fn extract_mailing_list_url(page: &PageText<'_>) -> Option<String> {
    let by_text = page.document.select(&ANCHOR_SELECTOR).find_map(|a| {
        let text = a.text().collect::<Vec<_>>().join(" ").to_lowercase();
        if !MAILING_LIST_PHRASES.iter().any(|p| text.contains(p)) {
            return None;
        }
        let href = a.value().attr("href")?.trim();
        if href.starts_with('#') {
            return None;
        }
        absolutize_url(page.base_url, href).filter(|url| is_absolute_http(url))
    });
    by_text.or_else(|| {
        NEWSLETTER_VENDOR_RE
            .find(page.html)
            .map(|m| m.as_str().replace("&amp;", "&"))
    })
}

/// First `order.online` link in `html`.
pub(crate) fn extract_order_online_url(html: &str) -> Option<String> {
    ORDER_ONLINE_RE
        .find(html)
        .map(|m| m.as_str().replace("&amp;", "&"))
}

fn is_absolute_http(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
#[path = "contact_test.rs"]
mod tests;
