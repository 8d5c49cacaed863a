//! Same-site subpage discovery.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use reqwest::Url;
use scraper::{Html, Selector};

use crate::constants::{COMMON_SUBPATHS, SUBPAGE_KEYWORDS};
use crate::fetch::site_origin;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));

/// Candidate subpage URLs for a home page, sorted and de-duplicated.
///
/// Same-site anchors whose path mentions a content keyword are kept as
/// `scheme://host[:port]/path` (query and fragment dropped). The
/// conventional paths in [`COMMON_SUBPATHS`] are always added on the
/// post-redirect origin.
#[must_use]
pub fn discover_subpages(document: &Html, final_url: &Url) -> BTreeSet<String> {
    let mut candidates: BTreeSet<String> = document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| final_url.join(href.trim()).ok())
        .filter(|target| is_same_site(target, final_url) && has_content_keyword(target))
        .map(|target| format!("{}{}", site_origin(&target), target.path()))
        .collect();

    let origin = site_origin(final_url);
    candidates.extend(COMMON_SUBPATHS.iter().map(|path| format!("{origin}{path}")));
    candidates
}

/// Same host and same explicit port; the scheme may differ.
fn is_same_site(target: &Url, home: &Url) -> bool {
    matches!(target.scheme(), "http" | "https")
        && target.host_str() == home.host_str()
        && target.port() == home.port()
}

fn has_content_keyword(target: &Url) -> bool {
    let path = target.path().trim_matches('/').to_lowercase();
    !path.is_empty() && SUBPAGE_KEYWORDS.iter().any(|kw| path.contains(kw))
}

/// Corpus label for a subpage: its path, slash-trimmed, dashes as spaces,
/// uppercased. `https://x.com/private-dining/` becomes `PRIVATE DINING`.
#[must_use]
pub fn path_label(url: &str) -> String {
    let path = Url::parse(url).map_or_else(|_| url.to_owned(), |u| u.path().to_owned());
    path.trim_matches('/').replace('-', " ").to_uppercase()
}
