//! Per-attempt request headers.

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, ORIGIN, PRAGMA,
    REFERER, USER_AGENT,
};

use crate::identity::Identity;

const ACCEPT_VALUE: &str = "application/json, text/plain, */*";
const ACCEPT_LANGUAGE_VALUE: &str = "zh-TW,zh;q=0.9,en-US;q=0.8,en;q=0.7";
const SEC_CH_UA_VALUE: &str = r#""Not_A Brand";v="8", "Chromium";v="120", "Google Chrome";v="120""#;

/// Headers a desktop browser sends on same-origin XHR traffic.
pub(super) fn browser_headers(identity: &Identity, origin: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(identity.user_agent));
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(
        HeaderName::from_static("sec-ch-ua"),
        HeaderValue::from_static(SEC_CH_UA_VALUE),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua-mobile"),
        HeaderValue::from_static("?0"),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua-platform"),
        HeaderValue::from_static(r#""macOS""#),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("empty"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("cors"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("same-origin"),
    );

    if let Ok(value) = HeaderValue::from_str(origin) {
        headers.insert(ORIGIN, value);
    }
    if let Ok(value) = HeaderValue::from_str(&format!("{origin}/")) {
        headers.insert(REFERER, value);
    }

    headers
}

/// Extra headers for the detail API call: AJAX markers, the CSRF token and
/// spoofed client addresses.
pub(super) fn api_headers(identity: &Identity, csrf_token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static("XMLHttpRequest"),
    );
    headers.insert(
        HeaderName::from_static("x-shopee-language"),
        HeaderValue::from_static("zh-Hant"),
    );
    headers.insert(
        HeaderName::from_static("x-api-source"),
        HeaderValue::from_static("pc"),
    );

    // Cookie values may carry bytes that are not valid header text; send an
    // empty token rather than failing the attempt.
    let csrf = HeaderValue::from_str(csrf_token).unwrap_or(HeaderValue::from_static(""));
    headers.insert(HeaderName::from_static("x-csrftoken"), csrf);

    for (name, ip) in [
        ("x-forwarded-for", &identity.forwarded_for),
        ("x-real-ip", &identity.real_ip),
    ] {
        if let Ok(value) = HeaderValue::from_str(ip) {
            headers.insert(HeaderName::from_static(name), value);
        }
    }

    headers
}
