use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::chain::{first_candidate, BorrowedStage};
use crate::fetch::{absolutize_url, site_origin};

/// Smallest declared icon width accepted as a logo stand-in.
const MIN_ICON_LOGO_WIDTH: u32 = 100;

static IMG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("valid selector"));
static HEADER_IMG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("header img, nav img").expect("valid selector"));
static ICON_LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"link[rel~="icon"][href]"#).expect("valid selector"));
static TOUCH_ICON_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"link[rel*="apple-touch-icon"][href]"#).expect("valid selector")
});
static SIZES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*x\s*(\d+)").expect("valid sizes regex"));

/// Image attributes checked for a usable source, in order. Lazy-loading
/// themes put a `data:` placeholder in `src` and the real URL elsewhere.
const IMG_SOURCE_ATTRS: [&str; 3] = ["src", "data-src", "data-lazy-src"];

struct PageRef<'a> {
    document: &'a Html,
    base_url: &'a Url,
}

/// Best-effort logo URL, resolved against `base_url`, or empty.
///
/// Tries in order: an `<img>` carrying a theme logo class (`custom-logo`,
/// `site-logo`), a header/nav `<img>` hinting "logo", any `<img>` hinting
/// "logo", and finally the largest `<link rel="icon">` declared at least
/// 100px wide.
#[must_use]
pub fn extract_logo_url(document: &Html, base_url: &Url) -> String {
    let stages: [BorrowedStage<'_, PageRef<'_>>; 4] = [
        &theme_logo_class,
        &header_logo_img,
        &any_logo_img,
        &large_icon_link,
    ];
    first_candidate(&stages, &PageRef { document, base_url }).unwrap_or_default()
}

/// Best-effort favicon URL, resolved against `base_url`.
///
/// Prefers `apple-touch-icon`, then the widest `<link rel="icon">`, then
/// guesses `/favicon.ico` on the site origin, so the result is never empty
/// for an http(s) base.
#[must_use]
pub fn extract_favicon_url(document: &Html, base_url: &Url) -> String {
    let stages: [BorrowedStage<'_, PageRef<'_>>; 3] =
        [&touch_icon_link, &widest_icon_link, &favicon_guess];
    first_candidate(&stages, &PageRef { document, base_url }).unwrap_or_default()
}

fn theme_logo_class(page: &PageRef<'_>) -> Option<String> {
    page.document
        .select(&IMG_SELECTOR)
        .filter(|img| {
            img.value().attr("class").is_some_and(|class| {
                let class = class.to_ascii_lowercase();
                class.contains("custom-logo") || class.contains("site-logo")
            })
        })
        .find_map(|img| image_source(img, page.base_url))
}

fn header_logo_img(page: &PageRef<'_>) -> Option<String> {
    page.document
        .select(&HEADER_IMG_SELECTOR)
        .filter(|img| has_logo_marker(*img))
        .find_map(|img| image_source(img, page.base_url))
}

fn any_logo_img(page: &PageRef<'_>) -> Option<String> {
    page.document
        .select(&IMG_SELECTOR)
        .filter(|img| has_logo_marker(*img))
        .find_map(|img| image_source(img, page.base_url))
}

fn large_icon_link(page: &PageRef<'_>) -> Option<String> {
    widest(
        page.document
            .select(&ICON_LINK_SELECTOR)
            .filter(|link| declared_width(*link).is_some_and(|w| w >= MIN_ICON_LOGO_WIDTH)),
        page.base_url,
    )
}

fn touch_icon_link(page: &PageRef<'_>) -> Option<String> {
    page.document
        .select(&TOUCH_ICON_SELECTOR)
        .filter_map(|link| link.value().attr("href"))
        .find_map(|href| absolutize_url(page.base_url, href))
}

fn widest_icon_link(page: &PageRef<'_>) -> Option<String> {
    widest(page.document.select(&ICON_LINK_SELECTOR), page.base_url)
}

fn favicon_guess(page: &PageRef<'_>) -> Option<String> {
    if !matches!(page.base_url.scheme(), "http" | "https") {
        return None;
    }
    Some(format!("{}/favicon.ico", site_origin(page.base_url)))
}

/// Picks the link with the largest declared width; undeclared sizes count as
/// zero and ties keep document order.
fn widest<'a>(links: impl Iterator<Item = ElementRef<'a>>, base_url: &Url) -> Option<String> {
    let mut best: Option<(u32, String)> = None;
    for link in links {
        let Some(url) = link
            .value()
            .attr("href")
            .and_then(|href| absolutize_url(base_url, href))
        else {
            continue;
        };
        let width = declared_width(link).unwrap_or(0);
        if best.as_ref().is_none_or(|(top, _)| width > *top) {
            best = Some((width, url));
        }
    }
    best.map(|(_, url)| url)
}

fn has_logo_marker(img: ElementRef<'_>) -> bool {
    let el = img.value();
    [el.attr("class"), el.attr("id"), el.attr("alt")]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
        .contains("logo")
}

fn image_source(img: ElementRef<'_>, base_url: &Url) -> Option<String> {
    IMG_SOURCE_ATTRS
        .iter()
        .filter_map(|attr| img.value().attr(attr))
        .map(str::trim)
        .find(|src| !src.is_empty() && !src.starts_with("data:"))
        .and_then(|src| absolutize_url(base_url, src))
}

fn declared_width(link: ElementRef<'_>) -> Option<u32> {
    link.value().attr("sizes").and_then(parse_sizes_attr)
}

/// Largest width in a `sizes` attribute such as `"16x16 192x192"`.
/// `"any"` and malformed values yield `None`.
fn parse_sizes_attr(value: &str) -> Option<u32> {
    SIZES_RE
        .captures_iter(value)
        .filter_map(|caps| caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()))
        .max()
}
