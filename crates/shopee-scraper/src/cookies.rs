//! Cookie helpers for the bootstrap and product-page requests.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use reqwest::header::{HeaderMap, SET_COOKIE};

use crate::identity::random_hex;

static CSRF_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|;\s*)csrftoken=([^;]+)").expect("valid regex"));

/// Builds the cookie header sent to the landing page, imitating a browser
/// that has visited before.
pub fn synthetic_cookie_header<R: Rng>(rng: &mut R, session_id: &str, now_ms: i64) -> String {
    let mut id = || rng.random_range(0..1_000_000u32);
    let (gcl, gid, ga, fbp) = (id(), id(), id(), id());
    let csrf = random_hex(rng, 32);
    format!(
        "AF_SID={session_id}; SPC_F=null; REC_T_ID=null; \
         _gcl_au=1.1.{now_ms}.{gcl}; __LOCALE__null=TW; \
         _gid=GA1.2.{gid}.{now_ms}; _ga=GA1.1.{ga}.{now_ms}; \
         _fbp=fb.1.{now_ms}.{fbp}; _tt_enable_cookie=1; csrftoken={csrf}"
    )
}

/// Returns the `name=value` part of every `Set-Cookie` header, dropping
/// attributes such as `Path` and `Expires`.
pub fn set_cookie_pairs(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|raw| raw.split(';').next())
        .map(str::trim)
        .filter(|pair| pair.contains('='))
        .map(str::to_owned)
        .collect()
}

/// Merges a cookie header string with additional `name=value` pairs.
///
/// Order of first appearance is kept; a later value for the same name
/// replaces the earlier one.
pub fn merge_cookies(base: &str, extra: &[String]) -> String {
    let mut merged: Vec<(&str, &str)> = Vec::new();
    let pairs = base
        .split(';')
        .map(str::trim)
        .chain(extra.iter().map(|s| s.trim()))
        .filter(|s| !s.is_empty());

    for pair in pairs {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        match merged.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => merged.push((name, value)),
        }
    }

    merged
        .iter()
        .map(|(n, v)| format!("{n}={v}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Pulls the `csrftoken` value out of a cookie header, or `""` if absent.
pub fn extract_csrf_token(cookies: &str) -> String {
    CSRF_TOKEN_RE
        .captures(cookies)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use reqwest::header::HeaderValue;

    use super::*;

    #[test]
    fn synthetic_cookie_carries_session_and_csrf() {
        let mut rng = StdRng::seed_from_u64(5);
        let cookie = synthetic_cookie_header(&mut rng, "abc123", 1_700_000_000_000);
        assert!(cookie.starts_with("AF_SID=abc123; "));
        assert!(cookie.contains("__LOCALE__null=TW"));
        assert!(cookie.contains("_gcl_au=1.1.1700000000000."));
        assert_eq!(extract_csrf_token(&cookie).len(), 64);
    }

    #[test]
    fn set_cookie_pairs_strips_attributes() {
        let mut headers = HeaderMap::new();
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("SPC_F=xyz; Path=/; Secure; HttpOnly"),
        );
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("csrftoken=tok; Expires=Wed, 21 Oct 2099 07:28:00 GMT"),
        );
        assert_eq!(set_cookie_pairs(&headers), vec!["SPC_F=xyz", "csrftoken=tok"]);
    }

    #[test]
    fn set_cookie_pairs_empty_without_header() {
        assert!(set_cookie_pairs(&HeaderMap::new()).is_empty());
    }

    #[test]
    fn merge_cookies_appends_new_names() {
        let merged = merge_cookies("a=1; b=2", &["c=3".to_string()]);
        assert_eq!(merged, "a=1; b=2; c=3");
    }

    #[test]
    fn merge_cookies_later_value_wins() {
        let merged = merge_cookies("a=1; b=2", &["a=9".to_string()]);
        assert_eq!(merged, "a=9; b=2");
    }

    #[test]
    fn merge_cookies_handles_empty_base() {
        let merged = merge_cookies("", &["a=1".to_string()]);
        assert_eq!(merged, "a=1");
        assert_eq!(merge_cookies("", &[]), "");
    }

    #[test]
    fn extract_csrf_token_finds_value() {
        assert_eq!(extract_csrf_token("a=1; csrftoken=abc; b=2"), "abc");
        assert_eq!(extract_csrf_token("csrftoken=first"), "first");
    }

    #[test]
    fn extract_csrf_token_ignores_suffix_match() {
        assert_eq!(extract_csrf_token("xcsrftoken=nope"), "");
    }

    #[test]
    fn extract_csrf_token_empty_when_absent() {
        assert_eq!(extract_csrf_token("a=1; b=2"), "");
        assert_eq!(extract_csrf_token(""), "");
    }
}
