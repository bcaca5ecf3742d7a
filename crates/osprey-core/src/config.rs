use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Default user agent sent on profile API requests. Matches a desktop Chrome
/// build; the web profile endpoint rejects obviously non-browser agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let database_url = require("DATABASE_URL")?;
    let llm_api_key = require("LLM_API_KEY")?;

    let env = parse_environment(&or_default("OSPREY_ENV", "development"));
    let bind_addr = parse_addr("OSPREY_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("OSPREY_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("OSPREY_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("OSPREY_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("OSPREY_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let llm_base_url = or_default(
        "OSPREY_LLM_BASE_URL",
        "https://generativelanguage.googleapis.com/v1beta/openai",
    );
    let llm_model = or_default("OSPREY_LLM_MODEL", "gemini-2.0-flash");
    let llm_max_tokens = parse_u32("OSPREY_LLM_MAX_TOKENS", "6000")?;
    let llm_temperature = parse_f64("OSPREY_LLM_TEMPERATURE", "0.3")?;
    let llm_request_timeout_secs = parse_u64("OSPREY_LLM_REQUEST_TIMEOUT_SECS", "60")?;

    let scraper_base_url = or_default("OSPREY_SCRAPER_BASE_URL", "https://www.instagram.com");
    let scraper_request_timeout_secs = parse_u64("OSPREY_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default("OSPREY_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let scraper_max_retries = parse_u32("OSPREY_SCRAPER_MAX_RETRIES", "3")?;
    let scraper_retry_backoff_base_ms = parse_u64("OSPREY_SCRAPER_RETRY_BACKOFF_BASE_MS", "1000")?;

    let session_landing_url = or_default("OSPREY_SESSION_LANDING_URL", "https://www.instagram.com/");
    let session_timeout_secs = parse_u64("OSPREY_SESSION_TIMEOUT_SECS", "30")?;

    let cache_ttl_days = parse_i64("OSPREY_CACHE_TTL_DAYS", "7")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        llm_api_key,
        llm_base_url,
        llm_model,
        llm_max_tokens,
        llm_temperature,
        llm_request_timeout_secs,
        scraper_base_url,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_max_retries,
        scraper_retry_backoff_base_ms,
        session_landing_url,
        session_timeout_secs,
        cache_ttl_days,
    })
}

fn parse_environment(s: &str) -> Environment {
    match s {
        "test" => Environment::Test,
        "production" => Environment::Production,
        _ => Environment::Development,
    }
}
