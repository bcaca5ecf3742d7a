//! Offline unit tests for osprey-db pool configuration and row types.
//! These tests do not require a live database connection.

use chrono::{Duration, Utc};
use osprey_core::{AppConfig, Environment};
use osprey_db::{is_fresh, PoolConfig, ProfileCacheRow};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

fn test_app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        llm_api_key: "key".to_string(),
        llm_base_url: "https://llm.example".to_string(),
        llm_model: "gemini-2.0-flash".to_string(),
        llm_max_tokens: 6000,
        llm_temperature: 0.3,
        llm_request_timeout_secs: 60,
        scraper_base_url: "https://www.instagram.com".to_string(),
        scraper_request_timeout_secs: 30,
        scraper_user_agent: "ua".to_string(),
        scraper_max_retries: 3,
        scraper_retry_backoff_base_ms: 1000,
        session_landing_url: "https://www.instagram.com/".to_string(),
        session_timeout_secs: 30,
        cache_ttl_days: 7,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&test_app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn pool_config_default_values() {
    let pool_config = PoolConfig::default();
    assert_eq!(pool_config.max_connections, 10);
    assert_eq!(pool_config.min_connections, 1);
    assert_eq!(pool_config.acquire_timeout_secs, 10);
}

/// Compile-time smoke test: confirm that [`ProfileCacheRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn profile_cache_row_has_expected_fields() {
    let row = ProfileCacheRow {
        username: "alice".to_string(),
        data: serde_json::json!({"username": "alice"}),
        report: serde_json::json!({"analysis_metadata": {}}),
        timestamp: Utc::now(),
    };

    assert_eq!(row.username, "alice");
    assert_eq!(row.data["username"], "alice");
    assert!(row.report.is_object());
}

#[test]
fn ttl_window_matches_cache_contract() {
    let ttl = Duration::days(7);
    let now = Utc::now();

    // An entry written 10 days ago must read as a miss, one written an hour
    // ago as a hit.
    assert!(!is_fresh(now - Duration::days(10), now, ttl));
    assert!(is_fresh(now - Duration::hours(1), now, ttl));
}
