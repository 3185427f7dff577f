//! HTTP client for the product detail API, with browser impersonation and
//! bounded retries.

mod attempt;
mod headers;
mod urls;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use rand::rngs::StdRng;
use rand::SeedableRng;
use reqwest::{Client, Url};
use shopee_core::ScraperConfig;

use crate::error::ScraperError;
use crate::retry::{run_with_retries, RetryPolicy, Sleeper, TokioSleeper};

pub use urls::parse_origin;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can resolve a `storeId`/`dealId` pair to the upstream JSON.
///
/// The HTTP layer depends on this rather than on [`ShopeeClient`] so
/// handlers can be exercised without network access.
pub trait ProductFetcher: Send + Sync {
    fn fetch_product<'a>(
        &'a self,
        store_id: &'a str,
        deal_id: &'a str,
    ) -> BoxFuture<'a, Result<serde_json::Value, ScraperError>>;
}

/// Scrapes the product detail API of one target origin.
///
/// The underlying `reqwest::Client` is shared and never mutated: every
/// attempt builds its own header set, so concurrent lookups cannot overwrite
/// each other's user agent or cookies.
pub struct ShopeeClient {
    pub(super) client: Client,
    pub(super) origin: Url,
    pub(super) policy: RetryPolicy,
    pub(super) sleeper: Arc<dyn Sleeper>,
    rng: Mutex<StdRng>,
}

impl ShopeeClient {
    /// Creates a client for the production origin.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidProxy`] if the configured proxy URL is
    /// rejected, or [`ScraperError::Http`] if the `reqwest::Client` cannot be
    /// constructed.
    pub fn new(config: &ScraperConfig) -> Result<Self, ScraperError> {
        Self::with_origin(config, shopee_core::app_config::DEFAULT_TARGET_ORIGIN)
    }

    /// Creates a client pointed at `origin` (a wiremock server in tests).
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidOrigin`] if `origin` is not an http(s) URL.
    /// - [`ScraperError::InvalidProxy`] if the configured proxy URL is rejected.
    /// - [`ScraperError::Http`] if the `reqwest::Client` cannot be constructed.
    pub fn with_origin(config: &ScraperConfig, origin: &str) -> Result<Self, ScraperError> {
        let origin = parse_origin(origin)?;
        let timeout = Duration::from_millis(config.timeout_ms());

        let mut builder = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout));

        if let Some(proxy_url) = config.proxy_url() {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| ScraperError::InvalidProxy {
                reason: e.to_string(),
            })?;
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            client: builder.build()?,
            origin,
            policy: RetryPolicy::from_config(config),
            sleeper: Arc::new(TokioSleeper),
            rng: Mutex::new(StdRng::from_os_rng()),
        })
    }

    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Overrides the pre-attempt jitter window (default `[1s, 3s)`).
    #[must_use]
    pub fn with_jitter(mut self, min: Duration, max: Duration) -> Self {
        self.policy = self.policy.with_jitter(min, max);
        self
    }

    /// Replaces the random source with a seeded one for reproducible output.
    #[must_use]
    pub fn with_rng_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches the product detail JSON for `store_id`/`deal_id`.
    ///
    /// Each attempt bootstraps cookies, visits the product page and then
    /// calls the signed API endpoint. The first 2xx JSON body is returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns the last attempt's error once all attempts have failed:
    /// - [`ScraperError::Http`]: network, TLS or timeout failure.
    /// - [`ScraperError::UnexpectedStatus`]: non-2xx product page or API response.
    /// - [`ScraperError::Deserialize`]: API body is not JSON.
    pub async fn fetch_product(
        &self,
        store_id: &str,
        deal_id: &str,
    ) -> Result<serde_json::Value, ScraperError> {
        tracing::debug!(store_id, deal_id, "fetching product");

        let result = run_with_retries(
            &self.policy,
            self.sleeper.as_ref(),
            || self.policy.jitter(&mut *self.rng()),
            |attempt| self.fetch_product_once(store_id, deal_id, attempt),
        )
        .await;

        if let Err(e) = &result {
            tracing::error!(store_id, deal_id, error = %e, "product scrape failed");
        }
        result
    }

    /// Locks the random source. Never hold the guard across an `.await`.
    pub(super) fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProductFetcher for ShopeeClient {
    fn fetch_product<'a>(
        &'a self,
        store_id: &'a str,
        deal_id: &'a str,
    ) -> BoxFuture<'a, Result<serde_json::Value, ScraperError>> {
        Box::pin(ShopeeClient::fetch_product(self, store_id, deal_id))
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
