use std::time::Duration;

use axum::http::{header, HeaderMap, HeaderValue};
use lazy_static::lazy_static;
use regex::Regex;

pub const SESSION_COOKIE: &str = "token";

/// `Set-Cookie` value carrying a freshly issued session token.
pub fn session_cookie(token: &str, max_age: Duration, secure: bool) -> anyhow::Result<HeaderValue> {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        max_age.as_secs()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    Ok(HeaderValue::from_str(&cookie)?)
}

/// Empty value with an already elapsed expiry, so the client drops it.
pub fn clear_session_cookie(secure: bool) -> HeaderValue {
    if secure {
        HeaderValue::from_static(
            "token=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Secure",
        )
    } else {
        HeaderValue::from_static(
            "token=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
        )
    }
}

/// Value of the session cookie, if the request carries a non-empty one.
pub fn read_session_cookie(headers: &HeaderMap) -> Option<String> {
    lazy_static! {
        static ref TOKEN_RE: Regex = Regex::new(r"(?:^|;)\s*token=([^;]*)").unwrap();
    }
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|raw| {
            TOKEN_RE
                .captures(raw)
                .map(|c| c[1].trim().to_string())
                .filter(|v| !v.is_empty())
        })
}
