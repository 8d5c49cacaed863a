use crate::app_config::{
    AppConfig, Environment, DEFAULT_OPENTABLE_SEARCH_URL, DEFAULT_USER_AGENT,
    DEFAULT_WEB_SEARCH_URL,
};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_secs = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("SITESCOUT_ENV", "development"));
    let log_level = or_default("SITESCOUT_LOG_LEVEL", "info");
    let scraper_user_agent = or_default("SITESCOUT_USER_AGENT", DEFAULT_USER_AGENT);

    let scraper_primary_timeout_secs = parse_secs("SITESCOUT_PRIMARY_TIMEOUT_SECS", "10")?;
    let scraper_subpage_timeout_secs = parse_secs("SITESCOUT_SUBPAGE_TIMEOUT_SECS", "5")?;
    let scraper_cache_ttl_secs = parse_secs("SITESCOUT_CACHE_TTL_SECS", "300")?;

    if scraper_primary_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SITESCOUT_PRIMARY_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    if scraper_subpage_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SITESCOUT_SUBPAGE_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let opentable_search_url =
        or_default("SITESCOUT_OPENTABLE_SEARCH_URL", DEFAULT_OPENTABLE_SEARCH_URL);
    let web_search_url = or_default("SITESCOUT_WEB_SEARCH_URL", DEFAULT_WEB_SEARCH_URL);

    Ok(AppConfig {
        env,
        log_level,
        scraper_user_agent,
        scraper_primary_timeout_secs,
        scraper_subpage_timeout_secs,
        scraper_cache_ttl_secs,
        opentable_search_url,
        web_search_url,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
