#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Desktop-browser `User-Agent` sent with every outbound request.
///
/// Restaurant sites behind bot filters commonly reject library default agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

pub const DEFAULT_OPENTABLE_SEARCH_URL: &str = "https://www.opentable.com/s";
pub const DEFAULT_WEB_SEARCH_URL: &str = "https://html.duckduckgo.com/html/";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub scraper_user_agent: String,
    /// Timeout for the home-page request.
    pub scraper_primary_timeout_secs: u64,
    /// Timeout for subpage, stylesheet and fallback-search requests.
    pub scraper_subpage_timeout_secs: u64,
    pub scraper_cache_ttl_secs: u64,
    pub opentable_search_url: String,
    pub web_search_url: String,
}
