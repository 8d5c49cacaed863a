//! Facebook and Instagram profile links.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::constants::{
    EXCLUDED_SOCIAL_HANDLES, FACEBOOK_NON_PROFILE_PATHS, INSTAGRAM_NON_PROFILE_PATHS,
};

static FACEBOOK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://(?:www\.|m\.|web\.)?facebook\.com/([a-z0-9_.-]+)(?:\?id=(\d+))?")
        .expect("valid regex")
});
static INSTAGRAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://(?:www\.)?instagram\.com/([a-z0-9_.]+)").expect("valid regex")
});

/// First venue Facebook profile in `html`, as `https://www.facebook.com/<handle>`.
pub(crate) fn extract_facebook_url(html: &str) -> Option<String> {
    first_profile(&FACEBOOK_RE, html, &FACEBOOK_NON_PROFILE_PATHS)
        .map(|handle| format!("https://www.facebook.com/{handle}"))
}

/// First venue Instagram profile in `html`, as `https://www.instagram.com/<handle>`.
pub(crate) fn extract_instagram_url(html: &str) -> Option<String> {
    first_profile(&INSTAGRAM_RE, html, &INSTAGRAM_NON_PROFILE_PATHS)
        .map(|handle| format!("https://www.instagram.com/{handle}"))
}

/// Facebook's path for accounts without a vanity handle; only meaningful
/// with its numeric `id` query.
const NUMERIC_PROFILE_PATH: &str = "profile.php";

fn first_profile(re: &Regex, html: &str, non_profile: &[&str]) -> Option<String> {
    re.captures_iter(html)
        .find_map(|caps| profile_path(&caps, non_profile))
}

fn profile_path(caps: &Captures<'_>, non_profile: &[&str]) -> Option<String> {
    let handle = caps.get(1)?.as_str().trim_end_matches('.');
    let lower = handle.to_ascii_lowercase();
    if lower == NUMERIC_PROFILE_PATH {
        return caps
            .get(2)
            .map(|id| format!("{NUMERIC_PROFILE_PATH}?id={}", id.as_str()));
    }
    if handle.is_empty()
        || EXCLUDED_SOCIAL_HANDLES.contains(&lower.as_str())
        || non_profile.contains(&lower.as_str())
    {
        return None;
    }
    Some(handle.to_owned())
}
