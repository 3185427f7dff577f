use std::net::SocketAddr;

use crate::ConfigError;

pub const DEFAULT_TARGET_ORIGIN: &str = "https://shopee.tw";

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

/// Outbound scraping settings. Validated once in [`ScraperConfig::new`] and
/// read-only afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct ScraperConfig {
    timeout_ms: u64,
    max_retries: u32,
    retry_delay_ms: u64,
    proxy_url: Option<String>,
}

impl ScraperConfig {
    /// Builds a validated scraper configuration.
    ///
    /// `max_retries` is the total number of attempts, so it must be at least 1.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] when `timeout_ms` is zero,
    /// `max_retries` is zero, or `proxy_url` is present but blank.
    pub fn new(
        timeout_ms: u64,
        max_retries: u32,
        retry_delay_ms: u64,
        proxy_url: Option<String>,
    ) -> Result<Self, ConfigError> {
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: "SHOPEE_PROXY_TIMEOUT_MS".to_string(),
                reason: "timeout must be greater than zero".to_string(),
            });
        }
        if max_retries == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: "SHOPEE_PROXY_MAX_RETRIES".to_string(),
                reason: "at least one attempt is required".to_string(),
            });
        }
        if proxy_url.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(ConfigError::InvalidEnvVar {
                var: "SHOPEE_PROXY_UPSTREAM_PROXY".to_string(),
                reason: "proxy URL must not be blank".to_string(),
            });
        }

        Ok(Self {
            timeout_ms,
            max_retries,
            retry_delay_ms,
            proxy_url,
        })
    }

    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    #[must_use]
    pub fn retry_delay_ms(&self) -> u64 {
        self.retry_delay_ms
    }

    #[must_use]
    pub fn proxy_url(&self) -> Option<&str> {
        self.proxy_url.as_deref()
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_retries: 3,
            retry_delay_ms: 2_000,
            proxy_url: None,
        }
    }
}

// Proxy URLs routinely carry `user:pass@` credentials.
impl std::fmt::Debug for ScraperConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScraperConfig")
            .field("timeout_ms", &self.timeout_ms)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("proxy_url", &self.proxy_url.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub target_origin: String,
    pub scraper: ScraperConfig,
}
