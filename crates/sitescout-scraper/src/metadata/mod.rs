//! Composite site-metadata extraction.
//!
//! Every sub-extractor runs on every page and degrades on its own: a field
//! that cannot be found is left empty and never blocks the others.

mod booking;
mod contact;
mod social;

use reqwest::Url;
use scraper::Html;
use sitescout_core::DetectedFields;

pub(crate) use booking::extract_resy_venue_url;

use contact::PageText;

/// Extracts booking, social, contact and address fields from one page.
///
/// Relative links are resolved against `page_url`, the URL the page was
/// served from after redirects.
///
/// `primary_color`, `logo_url` and `favicon_url` are left empty; those come
/// from the dedicated extractors and only for the home page.
#[must_use]
pub fn extract_site_metadata(raw_html: &[u8], page_url: &Url) -> DetectedFields {
    let html = String::from_utf8_lossy(raw_html);
    let lower = html.to_lowercase();
    let document = Html::parse_document(&html);
    let page = PageText {
        html: &html,
        document: &document,
        base_url: page_url,
    };

    let booking = booking::detect_booking_platform(&lower);
    let resy_url = if booking::has_resy_marker(&lower) {
        booking::extract_resy_venue_url(&html)
    } else {
        None
    };
    let opentable_rid = if booking::has_opentable_marker(&lower) {
        booking::extract_opentable_rid(&html)
    } else {
        None
    };
    let emails = contact::extract_corporate_emails(&html);
    let (address, google_maps_url) = contact::extract_address(&document).unwrap_or_default();

    DetectedFields {
        booking: booking.map(|p| p.as_str().to_owned()).unwrap_or_default(),
        opentable_rid: opentable_rid.unwrap_or_default(),
        tripleseat_form_id: booking::extract_tripleseat_form_id(&html, &lower)
            .unwrap_or_default(),
        resy_url: resy_url.unwrap_or_default(),
        mailing_list_url: contact::extract_mailing_list_url(&page).unwrap_or_default(),
        facebook_url: social::extract_facebook_url(&html).unwrap_or_default(),
        instagram_url: social::extract_instagram_url(&html).unwrap_or_default(),
        phone: contact::extract_phone(&page).unwrap_or_default(),
        email_general: emails.general,
        email_events: emails.events,
        email_marketing: emails.marketing,
        email_press: emails.press,
        address,
        google_maps_url,
        order_online_url: contact::extract_order_online_url(&html).unwrap_or_default(),
        ..DetectedFields::default()
    }
}
