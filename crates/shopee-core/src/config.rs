use crate::app_config::{AppConfig, Environment, ScraperConfig, DEFAULT_TARGET_ORIGIN};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
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
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("SHOPEE_PROXY_ENV", "development"))?;

    // Bare `PORT` is honoured for platforms that only inject a port number.
    let bind_addr = match lookup("SHOPEE_PROXY_BIND_ADDR") {
        Ok(raw) => raw
            .parse::<SocketAddr>()
            .map_err(|e| invalid("SHOPEE_PROXY_BIND_ADDR", e.to_string()))?,
        Err(_) => {
            let port = or_default("PORT", "3000")
                .parse::<u16>()
                .map_err(|e| invalid("PORT", e.to_string()))?;
            SocketAddr::from(([0, 0, 0, 0], port))
        }
    };

    let log_level = or_default("SHOPEE_PROXY_LOG_LEVEL", "info");

    let target_origin = or_default("SHOPEE_PROXY_TARGET_ORIGIN", DEFAULT_TARGET_ORIGIN);
    if !(target_origin.starts_with("http://") || target_origin.starts_with("https://")) {
        return Err(invalid(
            "SHOPEE_PROXY_TARGET_ORIGIN",
            format!("expected an http(s) origin, got \"{target_origin}\""),
        ));
    }

    let timeout_ms = parse_u64("SHOPEE_PROXY_TIMEOUT_MS", "10000")?;
    let max_retries = parse_u32("SHOPEE_PROXY_MAX_RETRIES", "3")?;
    let retry_delay_ms = parse_u64("SHOPEE_PROXY_RETRY_DELAY_MS", "2000")?;
    let proxy_url = lookup("SHOPEE_PROXY_UPSTREAM_PROXY")
        .ok()
        .filter(|p| !p.trim().is_empty());

    let scraper = ScraperConfig::new(timeout_ms, max_retries, retry_delay_ms, proxy_url)?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        target_origin: target_origin.trim_end_matches('/').to_string(),
        scraper,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SHOPEE_PROXY_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
