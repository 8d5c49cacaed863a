//! Primary brand color detection.
//!
//! Priority order:
//! 1. `<meta name="theme-color">`
//! 2. a `--*primary*` / `--*brand*` / `--*accent*` / `--*main*` custom
//!    property in inline CSS
//! 3. the dominant non-neutral inline color, if it appears at least
//!    [`INLINE_DOMINANT_MIN_COUNT`] times
//! 4. a matching custom property in external stylesheets
//! 5. the dominant non-neutral color across inline (weighted 3x) and
//!    external CSS
//!
//! External stylesheets are only fetched once steps 1-3 come up empty.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use scraper::{Html, Selector};

use crate::chain::{first_candidate, BorrowedStage, Stage};
use crate::constants::{MAX_STYLESHEET_BYTES, STYLESHEET_SKIP_DOMAINS};
use crate::fetch::{absolutize_url, PageFetcher};

/// Inline colors reaching this count short-circuit before any stylesheet fetch.
pub const INLINE_DOMINANT_MIN_COUNT: usize = 3;

/// Weight of an inline CSS color relative to an external one.
const INLINE_WEIGHT: usize = 3;

/// Channel spread below which a color counts as gray / near-white / near-black.
const NEUTRAL_SPREAD: u8 = 30;

static THEME_COLOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="theme-color"]"#).expect("valid selector"));
static STYLE_TAG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("style").expect("valid selector"));
static STYLE_ATTR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[style]").expect("valid selector"));
static STYLESHEET_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"link[rel~="stylesheet"][href]"#).expect("valid selector")
});

static THEME_HEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{3,8}$").expect("valid regex"));
static CUSTOM_PROPERTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)--[a-z0-9_-]*(?:primary|brand|accent|main)[a-z0-9_-]*\s*:\s*(#[0-9a-f]{3,8})\b",
    )
    .expect("valid regex")
});
static HEX6_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([0-9a-fA-F]{6})\b").expect("valid regex"));
static HEX3_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([0-9a-fA-F]{3})\b").expect("valid regex"));

/// Everything the color heuristics need from a parsed page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorSignals {
    /// Raw `content` of `<meta name="theme-color">`, if present.
    pub theme_color: Option<String>,
    /// `<style>` block bodies and `style=` attribute values, newline-joined.
    pub inline_css: String,
    /// `href`s of `<link rel="stylesheet">`, unresolved.
    pub stylesheet_hrefs: Vec<String>,
}

impl ColorSignals {
    #[must_use]
    pub fn from_document(document: &Html) -> Self {
        let theme_color = document
            .select(&THEME_COLOR_SELECTOR)
            .find_map(|el| el.value().attr("content"))
            .map(|c| c.trim().to_owned());

        let mut inline_parts: Vec<String> = document
            .select(&STYLE_TAG_SELECTOR)
            .map(|el| el.text().collect::<String>())
            .filter(|css| !css.trim().is_empty())
            .collect();
        inline_parts.extend(
            document
                .select(&STYLE_ATTR_SELECTOR)
                .filter_map(|el| el.value().attr("style"))
                .map(str::to_owned),
        );

        let stylesheet_hrefs = document
            .select(&STYLESHEET_SELECTOR)
            .filter_map(|el| el.value().attr("href"))
            .map(|href| href.trim().to_owned())
            .filter(|href| !href.is_empty())
            .collect();

        Self {
            theme_color,
            inline_css: inline_parts.join("\n"),
            stylesheet_hrefs,
        }
    }
}

/// Signals plus the concatenated body of every external stylesheet fetched.
struct ExternalEvidence<'a> {
    signals: &'a ColorSignals,
    external_css: String,
}

const LOCAL_STAGES: [Stage<ColorSignals>; 3] = [
    theme_color_stage,
    inline_custom_property_stage,
    inline_dominant_stage,
];

/// Detects the page's primary brand color as `#rrggbb`, or empty.
pub async fn extract_primary_color(
    fetcher: &PageFetcher,
    signals: &ColorSignals,
    base_url: &Url,
) -> String {
    if let Some(color) = first_candidate(&LOCAL_STAGES, signals) {
        return color;
    }

    let external_css = fetch_external_css(fetcher, &signals.stylesheet_hrefs, base_url).await;
    let evidence = ExternalEvidence {
        signals,
        external_css,
    };
    let external_stages: [BorrowedStage<'_, ExternalEvidence<'_>>; 2] =
        [&external_custom_property_stage, &weighted_dominant_stage];
    first_candidate(&external_stages, &evidence).unwrap_or_default()
}

fn theme_color_stage(signals: &ColorSignals) -> Option<String> {
    let raw = signals.theme_color.as_deref()?;
    if !THEME_HEX_RE.is_match(raw) {
        return None;
    }
    normalize_hex(raw)
}

fn inline_custom_property_stage(signals: &ColorSignals) -> Option<String> {
    custom_property_color(&signals.inline_css)
}

fn inline_dominant_stage(signals: &ColorSignals) -> Option<String> {
    let colors = extract_colors(&signals.inline_css);
    let (color, count) = tally(&[(&colors, 1)])?;
    (count >= INLINE_DOMINANT_MIN_COUNT).then_some(color)
}

fn external_custom_property_stage(evidence: &ExternalEvidence<'_>) -> Option<String> {
    custom_property_color(&evidence.external_css)
}

fn weighted_dominant_stage(evidence: &ExternalEvidence<'_>) -> Option<String> {
    let inline = extract_colors(&evidence.signals.inline_css);
    let external = extract_colors(&evidence.external_css);
    tally(&[(&inline, INLINE_WEIGHT), (&external, 1)]).map(|(color, _)| color)
}

async fn fetch_external_css(fetcher: &PageFetcher, hrefs: &[String], base_url: &Url) -> String {
    let mut parts: Vec<String> = Vec::new();
    for href in hrefs {
        let Some(url) = absolutize_url(base_url, href) else {
            continue;
        };
        if !is_fetchable_stylesheet(&url) {
            tracing::debug!(url = %url, "skipping stylesheet");
            continue;
        }
        if let Some(css) = fetcher.fetch_capped(&url, MAX_STYLESHEET_BYTES).await {
            parts.push(css);
        }
    }
    parts.join("\n")
}

fn is_fetchable_stylesheet(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    let Some(host) = parsed.host_str() else {
        return false;
    };
    !STYLESHEET_SKIP_DOMAINS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
}

fn custom_property_color(css: &str) -> Option<String> {
    CUSTOM_PROPERTY_RE
        .captures_iter(css)
        .filter_map(|cap| cap.get(1))
        .find_map(|m| normalize_hex(m.as_str()))
}

/// Normalizes a CSS hex color to lowercase `#rrggbb`.
///
/// `#rgb` / `#rgba` are expanded, `#rrggbbaa` loses its alpha. Any other
/// length is rejected.
#[must_use]
pub fn normalize_hex(hex: &str) -> Option<String> {
    let digits = hex.trim().trim_start_matches('#');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let digits = digits.to_ascii_lowercase();
    match digits.len() {
        3 | 4 => {
            let expanded: String = digits.chars().take(3).flat_map(|c| [c, c]).collect();
            Some(format!("#{expanded}"))
        }
        6 | 8 => Some(format!("#{}", &digits[..6])),
        _ => None,
    }
}

/// `true` for grays, near-whites and near-blacks (channel spread < 30).
///
/// Expects a normalized `#rrggbb`; anything unparseable counts as neutral.
#[must_use]
pub fn is_neutral(hex: &str) -> bool {
    let digits = hex.trim_start_matches('#');
    let channel = |i: usize| {
        digits
            .get(i..i + 2)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
    };
    let (Some(r), Some(g), Some(b)) = (channel(0), channel(2), channel(4)) else {
        return true;
    };
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    max - min < NEUTRAL_SPREAD
}

/// Every non-neutral 6- and 3-digit hex color in `css`, normalized.
#[must_use]
pub fn extract_colors(css: &str) -> Vec<String> {
    HEX6_RE
        .captures_iter(css)
        .chain(HEX3_RE.captures_iter(css))
        .filter_map(|cap| cap.get(1))
        .filter_map(|m| normalize_hex(m.as_str()))
        .filter(|c| !is_neutral(c))
        .collect()
}

/// Weighted frequency count. Ties go to the color seen first.
fn tally(sources: &[(&Vec<String>, usize)]) -> Option<(String, usize)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for (colors, weight) in sources {
        for color in colors.iter() {
            let entry = counts.entry(color.as_str()).or_insert_with(|| {
                order.push(color.as_str());
                0
            });
            *entry += weight;
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for color in order {
        let count = counts[color];
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((color, count));
        }
    }
    best.map(|(color, count)| (color.to_owned(), count))
}

#[cfg(test)]
#[path = "color_test.rs"]
mod tests;
