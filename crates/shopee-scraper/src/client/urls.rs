//! URL construction for the landing page, product page and detail API.

use reqwest::Url;

use super::ShopeeClient;
use crate::error::ScraperError;

/// Parses and validates a target origin such as `https://shopee.tw`.
///
/// Any path, query or fragment is discarded.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidOrigin`] if `origin` does not parse or is
/// not an http(s) URL with a host.
pub fn parse_origin(origin: &str) -> Result<Url, ScraperError> {
    let invalid = |reason: String| ScraperError::InvalidOrigin {
        origin: origin.to_owned(),
        reason,
    };

    let url = Url::parse(origin).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme \"{}\"", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_owned()));
    }

    Url::parse(&url.origin().ascii_serialization()).map_err(|e| invalid(e.to_string()))
}

impl ShopeeClient {
    /// `{origin}/`, used for the cookie bootstrap request.
    pub(super) fn landing_url(&self) -> Url {
        self.origin.clone()
    }

    /// `{origin}` without a trailing slash, as sent in `Origin`.
    pub(super) fn origin_header(&self) -> String {
        self.origin.origin().ascii_serialization()
    }

    /// `{origin}/product/{store_id}/{deal_id}`, with both ids percent-encoded
    /// as path segments.
    pub(super) fn product_url(&self, store_id: &str, deal_id: &str) -> Url {
        let mut url = self.origin.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.clear().extend(["product", store_id, deal_id]);
        }
        url
    }

    /// `{origin}/api/v4/pdp/get_pc?itemid=..&shopid=..&_ts=..&_sig=..`
    pub(super) fn api_url(
        &self,
        store_id: &str,
        deal_id: &str,
        timestamp_secs: i64,
        signature: &str,
    ) -> Url {
        let mut url = self.origin.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.clear().extend(["api", "v4", "pdp", "get_pc"]);
        }
        url.query_pairs_mut()
            .append_pair("itemid", deal_id)
            .append_pair("shopid", store_id)
            .append_pair("_ts", &timestamp_secs.to_string())
            .append_pair("_sig", signature);
        url
    }
}
