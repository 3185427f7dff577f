use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "SHOPEE_PROXY_ENV"));
}

#[test]
fn build_app_config_uses_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.target_origin, "https://shopee.tw");
    assert_eq!(cfg.scraper.timeout_ms(), 10_000);
    assert_eq!(cfg.scraper.max_retries(), 3);
    assert_eq!(cfg.scraper.retry_delay_ms(), 2_000);
    assert!(cfg.scraper.proxy_url().is_none());
}

#[test]
fn build_app_config_falls_back_to_port() {
    let mut map = HashMap::new();
    map.insert("PORT", "8081");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8081");
}

#[test]
fn build_app_config_bind_addr_wins_over_port() {
    let mut map = HashMap::new();
    map.insert("PORT", "8081");
    map.insert("SHOPEE_PROXY_BIND_ADDR", "127.0.0.1:9000");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:9000");
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("SHOPEE_PROXY_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPEE_PROXY_BIND_ADDR"),
        "expected InvalidEnvVar(SHOPEE_PROXY_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_port() {
    let mut map = HashMap::new();
    map.insert("PORT", "99999");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PORT"),
        "expected InvalidEnvVar(PORT), got: {result:?}"
    );
}

#[test]
fn build_app_config_reads_scraper_overrides() {
    let mut map = HashMap::new();
    map.insert("SHOPEE_PROXY_TIMEOUT_MS", "5000");
    map.insert("SHOPEE_PROXY_MAX_RETRIES", "5");
    map.insert("SHOPEE_PROXY_RETRY_DELAY_MS", "250");
    map.insert("SHOPEE_PROXY_UPSTREAM_PROXY", "http://proxy.local:3128");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.scraper.timeout_ms(), 5_000);
    assert_eq!(cfg.scraper.max_retries(), 5);
    assert_eq!(cfg.scraper.retry_delay_ms(), 250);
    assert_eq!(cfg.scraper.proxy_url(), Some("http://proxy.local:3128"));
}

#[test]
fn build_app_config_treats_blank_proxy_as_unset() {
    let mut map = HashMap::new();
    map.insert("SHOPEE_PROXY_UPSTREAM_PROXY", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.scraper.proxy_url().is_none());
}

#[test]
fn build_app_config_fails_with_non_numeric_timeout() {
    let mut map = HashMap::new();
    map.insert("SHOPEE_PROXY_TIMEOUT_MS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPEE_PROXY_TIMEOUT_MS"),
        "expected InvalidEnvVar(SHOPEE_PROXY_TIMEOUT_MS), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_zero_retries() {
    let mut map = HashMap::new();
    map.insert("SHOPEE_PROXY_MAX_RETRIES", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPEE_PROXY_MAX_RETRIES"),
        "expected InvalidEnvVar(SHOPEE_PROXY_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn build_app_config_strips_trailing_slash_from_origin() {
    let mut map = HashMap::new();
    map.insert("SHOPEE_PROXY_TARGET_ORIGIN", "http://127.0.0.1:4000/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.target_origin, "http://127.0.0.1:4000");
}

#[test]
fn build_app_config_rejects_non_http_origin() {
    let mut map = HashMap::new();
    map.insert("SHOPEE_PROXY_TARGET_ORIGIN", "shopee.tw");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPEE_PROXY_TARGET_ORIGIN"),
        "expected InvalidEnvVar(SHOPEE_PROXY_TARGET_ORIGIN), got: {result:?}"
    );
}
