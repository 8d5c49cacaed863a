//! Reservation-platform signals: Resy, OpenTable and Tripleseat.

use std::sync::LazyLock;

use regex::Regex;
use sitescout_core::BookingPlatform;

use crate::constants::GENERIC_RESY_SLUGS;

const RESY_MARKERS: [&str; 3] = ["widgets.resy.com", "resywidget", "resy.com/cities/"];
const OPENTABLE_MARKERS: [&str; 3] = [
    "opentable.com/widget",
    "opentable.com/r/",
    "opentable.com/restref",
];

static RESY_VENUES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)resy\.com/cities/([a-z0-9-]+)/venues/([a-z0-9-]+)").expect("valid regex")
});
static RESY_CITY_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)resy\.com/cities/([a-z0-9-]+)/([a-z0-9-]+)").expect("valid regex")
});
static OPENTABLE_RID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)opentable\.(?:com|ca|co\.uk)[^"'\s<>]*?[?&;]rid=(\d+)"#)
        .expect("valid regex")
});
static TRIPLESEAT_FORM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)lead_form_id=(\d+)").expect("valid regex"));

/// Detects the booking widget embedded in `lower_html` (already lowercased).
/// Resy wins when both platforms appear.
pub(crate) fn detect_booking_platform(lower_html: &str) -> Option<BookingPlatform> {
    if has_resy_marker(lower_html) {
        Some(BookingPlatform::Resy)
    } else if has_opentable_marker(lower_html) {
        Some(BookingPlatform::OpenTable)
    } else {
        None
    }
}

pub(crate) fn has_resy_marker(lower_html: &str) -> bool {
    RESY_MARKERS.iter().any(|m| lower_html.contains(m))
}

pub(crate) fn has_opentable_marker(lower_html: &str) -> bool {
    OPENTABLE_MARKERS.iter().any(|m| lower_html.contains(m))
}

/// Canonical Resy venue URL found anywhere in `text`.
///
/// `resy.com/cities/<city>/venues/<slug>` is preferred over the shorter
/// `resy.com/cities/<city>/<slug>`; listing slugs such as `new` or
/// `trending` are skipped.
pub(crate) fn extract_resy_venue_url(text: &str) -> Option<String> {
    let venue = RESY_VENUES_RE.captures_iter(text).find_map(|caps| {
        let city = caps.get(1)?.as_str().to_ascii_lowercase();
        let slug = caps.get(2)?.as_str().to_ascii_lowercase();
        (!is_generic_resy_slug(&slug))
            .then(|| format!("https://resy.com/cities/{city}/venues/{slug}"))
    });
    if venue.is_some() {
        return venue;
    }

    RESY_CITY_SLUG_RE.captures_iter(text).find_map(|caps| {
        let city = caps.get(1)?.as_str().to_ascii_lowercase();
        let slug = caps.get(2)?.as_str().to_ascii_lowercase();
        (!is_generic_resy_slug(&slug)).then(|| format!("https://resy.com/cities/{city}/{slug}"))
    })
}

fn is_generic_resy_slug(slug: &str) -> bool {
    GENERIC_RESY_SLUGS.contains(&slug)
}

/// Numeric `rid` query parameter from any OpenTable URL in `html`.
pub(crate) fn extract_opentable_rid(html: &str) -> Option<String> {
    OPENTABLE_RID_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
}

/// Tripleseat `lead_form_id`, only when the page references tripleseat.com.
pub(crate) fn extract_tripleseat_form_id(html: &str, lower_html: &str) -> Option<String> {
    if !lower_html.contains("tripleseat.com") {
        return None;
    }
    TRIPLESEAT_FORM_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
}
