//! One pass of the scrape: bootstrap cookies, product page, signed API call.

use chrono::Utc;
use reqwest::header::{HeaderMap, COOKIE};
use reqwest::RequestBuilder;

use super::headers::{api_headers, browser_headers};
use super::ShopeeClient;
use crate::cookies::{extract_csrf_token, merge_cookies, set_cookie_pairs, synthetic_cookie_header};
use crate::error::ScraperError;
use crate::identity::{random_signature, Identity};

fn with_cookies(request: RequestBuilder, cookies: &str) -> RequestBuilder {
    if cookies.is_empty() {
        request
    } else {
        request.header(COOKIE, cookies)
    }
}

impl ShopeeClient {
    pub(super) async fn fetch_product_once(
        &self,
        store_id: &str,
        deal_id: &str,
        attempt: u32,
    ) -> Result<serde_json::Value, ScraperError> {
        let (identity, synthetic_cookie) = {
            let now_ms = Utc::now().timestamp_millis();
            let mut rng = self.rng();
            let identity = Identity::generate(&mut *rng, now_ms);
            let cookie = synthetic_cookie_header(&mut *rng, &identity.session_id, now_ms);
            (identity, cookie)
        };
        let base_headers = browser_headers(&identity, &self.origin_header());

        let bootstrap = self
            .fetch_initial_cookies(&base_headers, &synthetic_cookie)
            .await;

        let product_url = self.product_url(store_id, deal_id);
        tracing::debug!(attempt, url = %product_url, "visiting product page");
        let response = with_cookies(
            self.client
                .get(product_url.clone())
                .headers(base_headers.clone()),
            &bootstrap,
        )
        .send()
        .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: product_url.to_string(),
            });
        }
        let cookies = merge_cookies(&bootstrap, &set_cookie_pairs(response.headers()));

        let timestamp = Utc::now().timestamp();
        let signature = random_signature(&mut *self.rng(), store_id, deal_id, timestamp);
        let csrf_token = extract_csrf_token(&cookies);

        let api_url = self.api_url(store_id, deal_id, timestamp, &signature);
        tracing::debug!(
            attempt,
            url = %api_url,
            has_csrf = !csrf_token.is_empty(),
            "calling detail API"
        );

        let mut headers = base_headers;
        headers.extend(api_headers(&identity, &csrf_token));

        let response = with_cookies(self.client.get(api_url.clone()).headers(headers), &cookies)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: api_url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<serde_json::Value>(&body).map_err(|e| ScraperError::Deserialize {
            context: format!("product detail for shop {store_id} item {deal_id}"),
            source: e,
        })
    }

    /// Visits the landing page with a synthetic browser cookie and returns
    /// the cookies it sets, joined as a `Cookie` header value.
    ///
    /// Never fails: any error is logged and yields an empty string so the
    /// attempt can continue without cookies.
    pub(super) async fn fetch_initial_cookies(
        &self,
        headers: &HeaderMap,
        synthetic_cookie: &str,
    ) -> String {
        match self.try_fetch_initial_cookies(headers, synthetic_cookie).await {
            Ok(cookies) => cookies,
            Err(e) => {
                tracing::warn!(error = %e, "cookie bootstrap failed, continuing without cookies");
                String::new()
            }
        }
    }

    async fn try_fetch_initial_cookies(
        &self,
        headers: &HeaderMap,
        synthetic_cookie: &str,
    ) -> Result<String, ScraperError> {
        let url = self.landing_url();
        let response = self
            .client
            .get(url.clone())
            .headers(headers.clone())
            .header(COOKIE, synthetic_cookie)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(set_cookie_pairs(response.headers()).join("; "))
    }
}
