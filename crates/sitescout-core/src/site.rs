//! Domain types produced by a website scrape.

use serde::{Deserialize, Serialize};

/// Online reservation platform detected on a restaurant site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingPlatform {
    Resy,
    OpenTable,
}

impl BookingPlatform {
    /// Value written into [`DetectedFields::booking`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BookingPlatform::Resy => "Resy",
            BookingPlatform::OpenTable => "OpenTable",
        }
    }
}

impl std::fmt::Display for BookingPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every field a scrape can detect on a restaurant website.
///
/// Fields are plain strings and default to empty: an empty value means
/// "not found, leave blank for manual entry", never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectedFields {
    pub primary_color: String,
    pub logo_url: String,
    pub favicon_url: String,
    /// `"Resy"`, `"OpenTable"` or empty.
    pub booking: String,
    pub opentable_rid: String,
    pub tripleseat_form_id: String,
    pub resy_url: String,
    pub mailing_list_url: String,
    pub facebook_url: String,
    pub instagram_url: String,
    pub phone: String,
    pub email_general: String,
    pub email_events: String,
    pub email_marketing: String,
    pub email_press: String,
    pub address: String,
    pub google_maps_url: String,
    pub order_online_url: String,
}

impl DetectedFields {
    /// Field names in declaration order.
    pub const FIELD_NAMES: [&'static str; 18] = [
        "primary_color",
        "logo_url",
        "favicon_url",
        "booking",
        "opentable_rid",
        "tripleseat_form_id",
        "resy_url",
        "mailing_list_url",
        "facebook_url",
        "instagram_url",
        "phone",
        "email_general",
        "email_events",
        "email_marketing",
        "email_press",
        "address",
        "google_maps_url",
        "order_online_url",
    ];

    /// Flat `(name, value)` view over every field.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 18] {
        let values = [
            &self.primary_color,
            &self.logo_url,
            &self.favicon_url,
            &self.booking,
            &self.opentable_rid,
            &self.tripleseat_form_id,
            &self.resy_url,
            &self.mailing_list_url,
            &self.facebook_url,
            &self.instagram_url,
            &self.phone,
            &self.email_general,
            &self.email_events,
            &self.email_marketing,
            &self.email_press,
            &self.address,
            &self.google_maps_url,
            &self.order_online_url,
        ];
        std::array::from_fn(|i| (Self::FIELD_NAMES[i], values[i].as_str()))
    }

    fn values_mut(&mut self) -> [&mut String; 18] {
        [
            &mut self.primary_color,
            &mut self.logo_url,
            &mut self.favicon_url,
            &mut self.booking,
            &mut self.opentable_rid,
            &mut self.tripleseat_form_id,
            &mut self.resy_url,
            &mut self.mailing_list_url,
            &mut self.facebook_url,
            &mut self.instagram_url,
            &mut self.phone,
            &mut self.email_general,
            &mut self.email_events,
            &mut self.email_marketing,
            &mut self.email_press,
            &mut self.address,
            &mut self.google_maps_url,
            &mut self.order_online_url,
        ]
    }

    /// Looks up a field by name. Returns `None` only for unknown names.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields()
            .into_iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// Gap-fill merge: adopts a value from `other` only where `self` is still
    /// empty. Values already present are never overwritten.
    ///
    /// Returns the names of the fields that were filled.
    pub fn fill_missing(&mut self, other: &DetectedFields) -> Vec<&'static str> {
        let incoming = other.fields();
        let mut filled = Vec::new();
        for (slot, (name, value)) in self.values_mut().into_iter().zip(incoming) {
            if slot.is_empty() && !value.is_empty() {
                value.clone_into(slot);
                filled.push(name);
            }
        }
        filled
    }

    /// `true` when no field has been detected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.is_empty())
    }
}

/// Outcome of one scrape invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResult {
    /// Whether enough content was retrieved to proceed.
    pub ok: bool,
    /// Combined page text, subpages first, capped at 8000 characters.
    pub text: String,
    /// User-facing message, set only when `ok` is false.
    pub error: String,
    pub detected: DetectedFields,
}

impl ScrapeResult {
    #[must_use]
    pub fn success(text: String, detected: DetectedFields) -> Self {
        Self {
            ok: true,
            text,
            error: String::new(),
            detected,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            text: String::new(),
            error: message.into(),
            detected: DetectedFields::default(),
        }
    }
}

#[cfg(test)]
#[path = "site_test.rs"]
mod tests;
