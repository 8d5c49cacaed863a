//! Static lists that steer the heuristics.
//!
//! Kept out of the extractor bodies so they can be audited and extended
//! without touching matching logic.

/// Path keywords that mark a same-domain link as a content subpage.
pub const SUBPAGE_KEYWORDS: [&str; 15] = [
    "about",
    "concept",
    "story",
    "menu",
    "cuisine",
    "food",
    "group",
    "private",
    "dining",
    "event",
    "party",
    "parties",
    "reserve",
    "reservation",
    "chef",
];

/// Conventional subpage paths always tried, since single-page sites often
/// navigate with in-page anchors instead of real links.
pub const COMMON_SUBPATHS: [&str; 10] = [
    "/about/",
    "/about-us/",
    "/group-dining/",
    "/private-dining/",
    "/private-events/",
    "/menu/",
    "/events/",
    "/the-cuisine/",
    "/the-concept/",
    "/chef/",
];

/// Upper bound on subpage fetches per scrape.
pub const MAX_SUBPAGES: usize = 10;

/// Stylesheet hosts that only serve fonts or framework CSS.
pub const STYLESHEET_SKIP_DOMAINS: [&str; 8] = [
    "fonts.googleapis.com",
    "fonts.gstatic.com",
    "use.typekit.net",
    "use.fontawesome.com",
    "cdnjs.cloudflare.com",
    "cdn.jsdelivr.net",
    "unpkg.com",
    "maxcdn.bootstrapcdn.com",
];

/// Bytes read from any single external stylesheet.
pub const MAX_STYLESHEET_BYTES: usize = 500_000;

/// Character cap on the combined text corpus.
pub const MAX_TEXT_CHARS: usize = 8000;

/// Below this many characters the corpus is too thin for copy generation.
pub const MIN_CORPUS_CHARS: usize = 50;

/// Subpage text at or below this length is treated as a navigation stub.
pub const MIN_SUBPAGE_TEXT_CHARS: usize = 30;

/// Name of the corporate parent, appended to Resy web searches.
pub const CORPORATE_SEARCH_QUALIFIER: &str = "starr";

/// Social handles owned by the corporate parent rather than a single venue.
pub const EXCLUDED_SOCIAL_HANDLES: [&str; 3] =
    ["starrrestaurants", "starrrestaurant", "starr_restaurants"];

/// Non-profile Facebook paths (share widgets, tracking pixels, directories).
pub const FACEBOOK_NON_PROFILE_PATHS: [&str; 11] = [
    "sharer",
    "sharer.php",
    "share.php",
    "plugins",
    "tr",
    "dialog",
    "groups",
    "pages",
    "people",
    "events",
    "watch",
];

/// Non-profile Instagram paths (posts, reels, stories, explore).
pub const INSTAGRAM_NON_PROFILE_PATHS: [&str; 6] =
    ["p", "reel", "reels", "stories", "explore", "accounts"];

/// Regex fragment for the corporate e-mail domain.
pub const CORPORATE_EMAIL_DOMAIN: &str = r"starr-?restaurants?\.com";

/// Resy slugs that are listing pages, not venues.
pub const GENERIC_RESY_SLUGS: [&str; 5] = ["", "new", "trending", "best", "venues"];
